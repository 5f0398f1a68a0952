//! Swift's punycode variant.
//!
//! Non-ASCII identifiers and operator glyphs are carried inside mangled
//! symbols as a bootstring encoding: the ASCII run is copied verbatim, a `_`
//! delimiter follows, and the non-ASCII scalars are delta-encoded after it.
//! The parameters match RFC 3492 except for the digit alphabet (`a..z` then
//! `A..J`) and the `_` delimiter.
//!
//! Decoding is a pure function over its input so concurrent decodes never
//! contend on anything.

const BASE: usize = 36;
const TMIN: usize = 1;
const TMAX: usize = 26;
const SKEW: usize = 38;
const DAMP: usize = 700;
const INITIAL_BIAS: usize = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: u8 = b'_';

fn digit_value(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some((byte - b'a') as usize),
        b'A'..=b'J' => Some((byte - b'A') as usize + 26),
        _ => None,
    }
}

fn adapt(mut delta: usize, num_points: usize, first: bool) -> usize {
    delta = if first { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - TMIN) * TMAX) / 2 {
        delta /= BASE - TMIN;
        k += BASE;
    }

    k + (BASE * delta) / (delta + SKEW)
}

/// Decodes one punycode-encoded identifier.
///
/// Returns `None` on anything that isn't an exact encoding: stray digits,
/// truncated variable-length integers or deltas that land outside unicode.
pub fn decode(input: &str) -> Option<String> {
    let (basic, extended) = match input.rfind(DELIMITER as char) {
        Some(pos) => (&input[..pos], &input[pos + 1..]),
        None => ("", input),
    };

    if !basic.is_ascii() {
        return None;
    }

    let mut output: Vec<char> = basic.chars().collect();
    let mut bytes = extended.bytes();
    let mut n = INITIAL_N;
    let mut i = 0usize;
    let mut bias = INITIAL_BIAS;
    let mut first = true;

    while bytes.len() != 0 {
        let old_i = i;
        let mut w = 1usize;
        let mut k = BASE;

        loop {
            let digit = digit_value(bytes.next()?)?;

            i = i.checked_add(digit.checked_mul(w)?)?;

            let t = (k.saturating_sub(bias)).clamp(TMIN, TMAX);
            if digit < t {
                break;
            }

            w = w.checked_mul(BASE - t)?;
            k += BASE;
        }

        bias = adapt(i - old_i, output.len() + 1, first);
        first = false;

        n = n.checked_add((i / (output.len() + 1)) as u32)?;
        i %= output.len() + 1;

        let chr = char::from_u32(n)?;
        if chr.is_control() {
            return None;
        }

        output.insert(i, chr);
        i += 1;
    }

    Some(output.into_iter().collect())
}

/// Inverse of [`decode`], kept as the round-trip oracle for the tests.
#[cfg(test)]
pub fn encode(input: &str) -> Option<String> {
    fn encode_digit(d: usize) -> u8 {
        match d {
            0..=25 => b'a' + d as u8,
            26..=35 => b'A' + (d - 26) as u8,
            _ => unreachable!(),
        }
    }

    let mut output: Vec<u8> = input.bytes().filter(|b| b.is_ascii()).collect();
    let basic_len = output.len();

    if basic_len == input.chars().count() {
        return Some(input.to_string());
    }

    if basic_len > 0 {
        output.push(DELIMITER);
    }

    let mut n = INITIAL_N;
    let mut delta = 0usize;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic_len;
    let mut first = true;

    while handled < input.chars().count() {
        let m = input
            .chars()
            .map(|c| c as u32)
            .filter(|&c| c >= n)
            .min()?;

        delta = delta.checked_add((m - n) as usize * (handled + 1))?;
        n = m;

        for c in input.chars().map(|c| c as u32) {
            if c < n {
                delta = delta.checked_add(1)?;
            }

            if c == n {
                let mut q = delta;
                let mut k = BASE;

                loop {
                    let t = (k.saturating_sub(bias)).clamp(TMIN, TMAX);
                    if q < t {
                        break;
                    }

                    output.push(encode_digit(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }

                output.push(encode_digit(q));
                bias = adapt(delta, handled + 1, first);
                first = false;
                delta = 0;
                handled += 1;
            }
        }

        delta += 1;
        n += 1;
    }

    String::from_utf8(output).ok()
}
