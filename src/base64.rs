//! Lenient Base64 decoding of textual payloads.
//!
//! Both the standard (`+/`) and the url safe (`-_`) alphabet are accepted, `,` counts as `/`.
//! Characters outside the alphabet decode as zero. Whitespace, control characters and non-ASCII
//! bytes are skipped between groups of four. A `=` or `.` in the third or fourth place of a group
//! ends the text, as does a NUL byte anywhere.

static INDEX: [u8; 256] = build_index();

const fn build_index() -> [u8; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 26 {
        table[b'A' as usize + i] = i as u8;
        table[b'a' as usize + i] = 26 + i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = 52 + i as u8;
        i += 1;
    }
    table[b'+' as usize] = 62;
    table[b'-' as usize] = 62;
    table[b'.' as usize] = 62;
    table[b'/' as usize] = 63;
    table[b'_' as usize] = 63;
    table[b',' as usize] = 63;
    table
}

/// Decode `text` into bytes.
///
/// Never fails, malformed text yields garbage or stops early.
pub fn decode(text: &[u8]) -> Vec<u8> {
    let text = match text.iter().position(|&b| b == 0) {
        Some(end) => &text[..end],
        None => text,
    };

    let mut out = Vec::with_capacity(3 * (1 + text.len() / 4));
    let mut rest = text;
    while rest.len() >= 2 {
        if is_skipped(rest[0]) {
            rest = &rest[1..];
            continue;
        }

        let v1 = sextet(rest[0]);
        let v2 = sextet(rest[1]);
        out.push((v1 << 2) | (v2 >> 4));

        let v3 = match rest.get(2) {
            Some(&c) if !is_terminator(c) => sextet(c),
            _ => break,
        };
        out.push(((v2 & 0x0f) << 4) | (v3 >> 2));

        let v4 = match rest.get(3) {
            Some(&c) if !is_terminator(c) => sextet(c),
            _ => break,
        };
        out.push(((v3 & 0x03) << 6) | v4);

        rest = &rest[4..];
    }

    out
}

fn sextet(c: u8) -> u8 {
    INDEX[usize::from(c)]
}

fn is_skipped(c: u8) -> bool {
    c <= b' ' || !c.is_ascii()
}

fn is_terminator(c: u8) -> bool {
    c == b'=' || c == b'.' || !c.is_ascii()
}
