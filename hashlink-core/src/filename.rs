//! Declared-name cleaning used to guess archive file names.

use std::sync::LazyLock;

/// Known ROM, disk-image and container extensions (without the leading dot).
///
/// Multi-part suffixes are listed alongside their last part; matching is
/// done longest-first so `nkit.iso` wins over `iso`.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    // containers
    "zip", "7z", "rar", "gz", "tar.gz", "tgz",
    // cartridge dumps
    "nes", "fds", "unf", "unif", "sfc", "smc", "fig", "swc", "bs", "st",
    "n64", "z64", "v64", "ndd", "gb", "gbc", "gba", "nds", "dsi", "3ds",
    "cia", "vb", "vboy", "pce", "sgx", "md", "gen", "smd", "32x",
    "sms", "gg", "sg", "sc", "col", "a26", "a52", "a78", "j64", "jag",
    "lnx", "lyx", "ngp", "ngc", "ngpc", "ws", "wsc", "pc2", "vec",
    "chf", "o2", "bin", "rom", "mx1", "mx2", "ri", "dsk", "cas", "wav",
    "tap", "tzx", "cdt", "sna", "d64", "t64", "prg", "crt", "g64", "atr",
    "xex", "xfd", "car", "adf", "ipf", "hdf", "lha", "woz",
    "nib", "2mg", "dim", "d88", "fdi", "hdm", "xdf", "mgt", "trd", "scl",
    "uze", "arduboy", "hex", "p8", "png", "wasm", "tic", "fd",
    "min", "int", "sv", "pgm", "z80", "mgw",
    // disc images
    "iso", "cue", "chd", "gdi", "cdi", "ccd", "img", "sub", "mds", "mdf",
    "nrg", "toc", "m3u", "pbp", "cso", "zso", "gcm", "gcz", "rvz", "wbfs",
    "wia", "ciso", "nkit.iso", "nkit.rvz", "wud", "wux", "rpx", "nsp", "xci",
    "elf", "dol", "xbe", "xiso",
];

static EXTENSIONS_LONGEST_FIRST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut exts = KNOWN_EXTENSIONS.to_vec();
    exts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    exts
});

/// Longest suffix treated as an extension when it is not in the known list.
const MAX_UNLISTED_EXTENSION_LEN: usize = 4;

/// Strip one trailing extension (case-insensitive).
///
/// Known extensions are tried longest-first. Any other final `.suffix` of up
/// to four ASCII alphanumerics with at least one letter is stripped too, so
/// `Dr. Mario (World)` and `Game v1.10` keep their dots. A name that would be
/// left empty is returned unchanged (`".zip"` stays `".zip"`).
pub fn strip_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in EXTENSIONS_LONGEST_FIRST.iter() {
        // `lower` has the same byte offsets as `name` since only ASCII changed
        let suffix_len = ext.len() + 1;
        if lower.len() > suffix_len
            && lower.ends_with(*ext)
            && lower.as_bytes()[lower.len() - suffix_len] == b'.'
        {
            return &name[..name.len() - suffix_len];
        }
    }

    if let Some(dot) = name.rfind('.')
        && dot > 0
    {
        let suffix = &name[dot + 1..];
        if (1..=MAX_UNLISTED_EXTENSION_LEN).contains(&suffix.len())
            && suffix.bytes().all(|b| b.is_ascii_alphanumeric())
            && suffix.bytes().any(|b| b.is_ascii_alphabetic())
        {
            return &name[..dot];
        }
    }
    name
}

/// Drop any leading `/` or `\` separators.
pub fn trim_leading_separator(name: &str) -> &str {
    name.trim_start_matches(['/', '\\'])
}

/// Remove every `<...>` segment and collapse the whitespace left behind.
pub fn strip_decorations(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    collapse_whitespace(&out)
}

/// Keep the decoration text but drop the angle brackets themselves.
pub fn unwrap_decorations(name: &str) -> String {
    let out: String = name.chars().filter(|c| *c != '<' && *c != '>').collect();
    collapse_whitespace(&out)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned name variants to try, in order.
///
/// Names with angle-bracket decorations yield the fully stripped variant
/// first and then the one with brackets removed; other names yield one
/// variant. Each variant has its leading separator and extension removed.
pub fn name_variants(declared: &str) -> Vec<String> {
    let base = trim_leading_separator(declared.trim());

    let raw_variants = if base.contains('<') {
        vec![strip_decorations(base), unwrap_decorations(base)]
    } else {
        vec![base.to_string()]
    };

    let mut variants: Vec<String> = Vec::with_capacity(raw_variants.len());
    for raw in raw_variants {
        let cleaned = strip_extension(raw.trim()).trim().to_string();
        if !cleaned.is_empty() && !variants.contains(&cleaned) {
            variants.push(cleaned);
        }
    }
    variants
}

#[cfg(test)]
#[path = "tests/filename_tests.rs"]
mod tests;
