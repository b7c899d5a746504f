//! printf-style message interpolation.
//!
//! Templates use the `%[flags][width][.precision]verb` syntax known from C
//! and Go. Supported verbs:
//!
//! | verb            | arguments                    |
//! |-----------------|------------------------------|
//! | `%v`            | any (natural rendering)      |
//! | `%s` `%q`       | strings, chars, JSON values  |
//! | `%d` `%b` `%o` `%x` `%X` `%c` `%U` | integers, chars |
//! | `%x` `%X`       | strings (hex of the bytes)   |
//! | `%f` `%F` `%e` `%E` `%g` `%G` | floats         |
//! | `%t`            | booleans                     |
//! | `%%`            | literal percent, no argument |
//!
//! Problems are reported inline instead of failing the call:
//! `%!d(string=foo)` for a verb that does not fit its argument,
//! `%!s(MISSING)` when arguments run out, `%!(EXTRA int=1)` for leftovers
//! and `%!(NOVERB)` for a trailing `%`.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::iter::Peekable;
use std::str::Chars;

const MAX_WIDTH: usize = 1_000_000;

/// A single substitution argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<'a> {
    Str(Cow<'a, str>),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Json(Value),
}

impl Arg<'_> {
    /// Captures anything `Display` as a string argument.
    pub fn display(value: impl fmt::Display) -> Arg<'static> {
        Arg::Str(Cow::Owned(value.to_string()))
    }

    fn scalar(&self) -> Scalar<'_> {
        match self {
            Arg::Str(s) => Scalar::Str(s),
            Arg::Int(i) => Scalar::Int(*i),
            Arg::Uint(u) => Scalar::Uint(*u),
            Arg::Float(f) => Scalar::Float(*f),
            Arg::Bool(b) => Scalar::Bool(*b),
            Arg::Char(c) => Scalar::Char(*c),
            Arg::Json(value) => match value {
                Value::String(s) => Scalar::Str(s),
                Value::Bool(b) => Scalar::Bool(*b),
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Scalar::Int(i)
                    } else if let Some(u) = n.as_u64() {
                        Scalar::Uint(u)
                    } else {
                        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
                    }
                }
                other => Scalar::Json(other),
            },
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Arg::Str(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Arg::Str(value)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(value: $t) -> Self {
                Arg::Int(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(value: $t) -> Self {
                Arg::Uint(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        // Go through the shortest f32 rendering so 0.1f32 prints as 0.1.
        Arg::Float(value.to_string().parse().unwrap_or(f64::from(value)))
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<Value> for Arg<'_> {
    fn from(value: Value) -> Self {
        Arg::Json(value)
    }
}

impl From<&Value> for Arg<'_> {
    fn from(value: &Value) -> Self {
        Arg::Json(value.clone())
    }
}

/// Borrowed view of an argument with JSON scalars unwrapped.
#[derive(Clone, Copy)]
enum Scalar<'s> {
    Str(&'s str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Json(&'s Value),
}

impl Scalar<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "string",
            Scalar::Int(_) => "int",
            Scalar::Uint(_) => "uint",
            Scalar::Float(_) => "float64",
            Scalar::Bool(_) => "bool",
            Scalar::Char(_) => "char",
            Scalar::Json(_) => "json",
        }
    }

    /// The `%v` rendering without flags, used in diagnostics.
    fn plain(&self) -> String {
        match self {
            Scalar::Str(s) => (*s).to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Uint(u) => u.to_string(),
            Scalar::Float(f) => {
                let mut out = String::new();
                Spec::default().fmt_float(*f, 'v', &mut out);
                out
            }
            Scalar::Bool(b) => b.to_string(),
            Scalar::Char(c) => c.to_string(),
            Scalar::Json(v) => v.to_string(),
        }
    }

    fn code_point(&self) -> Option<(bool, u64)> {
        match self {
            Scalar::Int(i) => Some((*i < 0, i.unsigned_abs())),
            Scalar::Uint(u) => Some((false, *u)),
            Scalar::Char(c) => Some((false, u64::from(u32::from(*c)))),
            _ => None,
        }
    }
}

/// Interpolates `args` into `template`.
///
/// With no arguments the template is returned untouched, so a literal `%` in
/// a plain message survives.
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                '#' => spec.sharp = true,
                '0' => spec.zero = true,
                ' ' => spec.space = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = read_number(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            spec.precision = Some(read_number(&mut chars).unwrap_or(0));
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        let Some(arg) = args.get(next_arg) else {
            let _ = write!(out, "%!{verb}(MISSING)");
            continue;
        };
        next_arg += 1;
        spec.format(verb, arg.scalar(), &mut out);
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let scalar = arg.scalar();
            let _ = write!(out, "{}={}", scalar.type_name(), scalar.plain());
        }
        out.push(')');
    }

    out
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        let current = value.unwrap_or(0);
        value = Some(
            current
                .saturating_mul(10)
                .saturating_add(digit as usize)
                .min(MAX_WIDTH),
        );
        chars.next();
    }
    value
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    plus: bool,
    sharp: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Spec {
    fn format(&self, verb: char, arg: Scalar<'_>, out: &mut String) {
        match (verb, arg) {
            ('v' | 's', Scalar::Str(s)) => self.fmt_str(s, out),
            ('v' | 's', Scalar::Char(c)) => self.pad(&c.to_string(), out),
            ('v' | 's', Scalar::Json(v)) => self.pad(&v.to_string(), out),
            ('v' | 't', Scalar::Bool(b)) => self.pad(if b { "true" } else { "false" }, out),
            ('q', Scalar::Str(s)) => self.pad(&quote(s, '"'), out),
            ('v' | 'd', Scalar::Int(_) | Scalar::Uint(_)) | ('d', Scalar::Char(_)) => {
                self.fmt_code_point(arg, 10, false, out);
            }
            ('b', _) if arg.code_point().is_some() => self.fmt_code_point(arg, 2, false, out),
            ('o', _) if arg.code_point().is_some() => self.fmt_code_point(arg, 8, false, out),
            ('x', _) if arg.code_point().is_some() => self.fmt_code_point(arg, 16, false, out),
            ('X', _) if arg.code_point().is_some() => self.fmt_code_point(arg, 16, true, out),
            ('x', Scalar::Str(s)) => self.fmt_hex_bytes(s, false, out),
            ('X', Scalar::Str(s)) => self.fmt_hex_bytes(s, true, out),
            ('c' | 'q' | 'U', _) if arg.code_point().is_some() => {
                let (neg, n) = arg.code_point().unwrap_or_default();
                let c = if neg {
                    char::REPLACEMENT_CHARACTER
                } else {
                    u32::try_from(n)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                };
                match verb {
                    'c' => self.pad(&c.to_string(), out),
                    'q' => self.pad(&quote(&c.to_string(), '\''), out),
                    _ => self.pad(&format!("U+{:04X}", u32::from(c)), out),
                }
            }
            ('v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G', Scalar::Float(f)) => {
                self.fmt_float(f, verb, out);
            }
            _ => {
                let _ = write!(out, "%!{verb}({}={})", arg.type_name(), arg.plain());
            }
        }
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn fmt_str(&self, s: &str, out: &mut String) {
        match self.precision {
            Some(p) => {
                let truncated: String = s.chars().take(p).collect();
                self.pad(&truncated, out);
            }
            None => self.pad(s, out),
        }
    }

    fn fmt_hex_bytes(&self, s: &str, upper: bool, out: &mut String) {
        let bytes = match self.precision {
            Some(p) => &s.as_bytes()[..p.min(s.len())],
            None => s.as_bytes(),
        };
        let mut hex = String::with_capacity(bytes.len() * 2 + 2);
        if self.sharp {
            hex.push_str(if upper { "0X" } else { "0x" });
        }
        for b in bytes {
            if upper {
                let _ = write!(hex, "{b:02X}");
            } else {
                let _ = write!(hex, "{b:02x}");
            }
        }
        self.pad(&hex, out);
    }

    fn fmt_code_point(&self, arg: Scalar<'_>, base: u32, upper: bool, out: &mut String) {
        let (negative, magnitude) = arg.code_point().unwrap_or_default();
        let mut digits = match (base, upper) {
            (2, _) => format!("{magnitude:b}"),
            (8, _) => format!("{magnitude:o}"),
            (16, false) => format!("{magnitude:x}"),
            (16, true) => format!("{magnitude:X}"),
            _ => magnitude.to_string(),
        };

        if let Some(p) = self.precision {
            if p == 0 && magnitude == 0 {
                digits.clear();
            } else if digits.len() < p {
                digits.insert_str(0, &"0".repeat(p - digits.len()));
            }
        }

        let prefix = match (self.sharp, base, upper) {
            (true, 2, _) => "0b",
            (true, 8, _) if !digits.starts_with('0') => "0",
            (true, 16, false) => "0x",
            (true, 16, true) => "0X",
            _ => "",
        };

        let lead = format!("{}{prefix}", self.sign(negative));
        self.pad_number(&lead, &digits, self.precision.is_none(), out);
    }

    fn fmt_float(&self, f: f64, verb: char, out: &mut String) {
        if f.is_nan() {
            let sign = if self.plus { "+" } else if self.space { " " } else { "" };
            self.pad_number(sign, "NaN", false, out);
            return;
        }
        if f.is_infinite() {
            let sign = if f < 0.0 { "-" } else if self.space && !self.plus { " " } else { "+" };
            self.pad_number(sign, "Inf", false, out);
            return;
        }

        let negative = f.is_sign_negative();
        let magnitude = f.abs();
        let body = match verb {
            'f' | 'F' => format!("{:.*}", self.precision.unwrap_or(6), magnitude),
            'e' | 'E' => format_exp(magnitude, self.precision.unwrap_or(6), verb == 'E'),
            'G' => format_general(magnitude, self.precision, true),
            _ => format_general(magnitude, self.precision, false),
        };
        self.pad_number(self.sign(negative), &body, true, out);
    }

    fn pad(&self, s: &str, out: &mut String) {
        let len = s.chars().count();
        let width = self.width.unwrap_or(0);
        if width <= len {
            out.push_str(s);
            return;
        }
        let fill = width - len;
        if self.minus {
            out.push_str(s);
            out.extend(std::iter::repeat_n(' ', fill));
        } else {
            let pad = if self.zero { '0' } else { ' ' };
            out.extend(std::iter::repeat_n(pad, fill));
            out.push_str(s);
        }
    }

    fn pad_number(&self, lead: &str, digits: &str, zero_ok: bool, out: &mut String) {
        let len = lead.chars().count() + digits.chars().count();
        let width = self.width.unwrap_or(0);
        if width <= len {
            out.push_str(lead);
            out.push_str(digits);
            return;
        }
        let fill = width - len;
        if self.minus {
            out.push_str(lead);
            out.push_str(digits);
            out.extend(std::iter::repeat_n(' ', fill));
        } else if self.zero && zero_ok {
            out.push_str(lead);
            out.extend(std::iter::repeat_n('0', fill));
            out.push_str(digits);
        } else {
            out.extend(std::iter::repeat_n(' ', fill));
            out.push_str(lead);
            out.push_str(digits);
        }
    }
}

/// `%e` rendering with a signed, at least two digit exponent (`1.5e+06`).
fn format_exp(f: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{f:.precision$e}");
    let (mantissa, exp) = split_exponent(&raw);
    join_exponent(mantissa, exp, upper)
}

/// `%g` / `%v` rendering.
///
/// Without a precision the shortest round-tripping digits are used and the
/// exponent form kicks in for exponents below -4 or at or above 6.
fn format_general(f: f64, precision: Option<usize>, upper: bool) -> String {
    let (digits, dp) = decimal_digits(f, precision);
    let nd = digits.len() as i64;

    let mut prec = match precision {
        None => nd,
        Some(p) => p.max(1) as i64,
    };
    let mut eprec = prec;
    if eprec > nd && nd >= dp {
        eprec = nd;
    }
    if precision.is_none() {
        eprec = 6;
    }

    let exp = dp - 1;
    if exp < -4 || exp >= eprec {
        if prec > nd {
            prec = nd;
        }
        let mut mantissa = digits[..1].to_string();
        if prec > 1 {
            mantissa.push('.');
            mantissa.push_str(&digits[1..prec as usize]);
        }
        return join_exponent(&mantissa, exp, upper);
    }

    if prec > dp {
        prec = nd;
    }
    let frac = (prec - dp).max(0);
    fixed_from_digits(&digits, dp, frac)
}

/// Significant decimal digits (no trailing zeros) and the decimal point
/// position, so that `f == 0.d1d2d3... * 10^dp`.
fn decimal_digits(f: f64, precision: Option<usize>) -> (String, i64) {
    if f == 0.0 {
        return ("0".to_string(), 1);
    }
    let raw = match precision {
        None => format!("{f:e}"),
        Some(p) => format!("{:.*e}", p.max(1) - 1, f),
    };
    let (mantissa, exp) = split_exponent(&raw);
    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    (digits, exp + 1)
}

fn fixed_from_digits(digits: &str, dp: i64, frac: i64) -> String {
    let nd = digits.len() as i64;
    let mut out = String::new();
    if dp > 0 {
        let take = dp.min(nd) as usize;
        out.push_str(&digits[..take]);
        out.extend(std::iter::repeat_n('0', (dp - take as i64) as usize));
    } else {
        out.push('0');
    }
    if frac > 0 {
        out.push('.');
        for i in 0..frac {
            let pos = dp + i;
            let digit = if (0..nd).contains(&pos) {
                digits.as_bytes()[pos as usize] as char
            } else {
                '0'
            };
            out.push(digit);
        }
    }
    out
}

fn split_exponent(raw: &str) -> (&str, i64) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i64, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.abs())
}

fn quote(s: &str, delim: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let n = u32::from(c);
                if n < 0x80 {
                    let _ = write!(out, "\\x{n:02x}");
                } else {
                    let _ = write!(out, "\\u{n:04x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(template: &str, args: &[Arg<'_>]) -> String {
        sprintf(template, args)
    }

    #[test]
    fn test_no_args_is_verbatim() {
        assert_eq!(f("100% real %s %d", &[]), "100% real %s %d");
    }

    #[test]
    fn test_mixed_verbs() {
        let out = f(
            "string: %s int: %d float: %.2f bool: %t",
            &["I'm real".into(), 5.into(), 0.1.into(), true.into()],
        );
        assert_eq!(out, "string: I'm real int: 5 float: 0.10 bool: true");
    }

    #[test]
    fn test_percent_literal_with_args() {
        assert_eq!(f("%d%%", &[42.into()]), "42%");
    }

    #[test]
    fn test_natural_rendering() {
        assert_eq!(f("%v", &["s".into()]), "s");
        assert_eq!(f("%v", &[(-7).into()]), "-7");
        assert_eq!(f("%v", &[u64::MAX.into()]), "18446744073709551615");
        assert_eq!(f("%v", &[false.into()]), "false");
        assert_eq!(f("%v", &['x'.into()]), "x");
        assert_eq!(f("%v", &[serde_json::json!({"a": [1, 2]}).into()]), r#"{"a":[1,2]}"#);
        assert_eq!(f("%v", &[serde_json::json!(null).into()]), "null");
    }

    #[test]
    fn test_float_general() {
        assert_eq!(f("%v", &[0.1.into()]), "0.1");
        assert_eq!(f("%v", &[5.0.into()]), "5");
        assert_eq!(f("%v", &[100000.0.into()]), "100000");
        assert_eq!(f("%v", &[1e6.into()]), "1e+06");
        assert_eq!(f("%v", &[123456789.0.into()]), "1.23456789e+08");
        assert_eq!(f("%v", &[0.0001.into()]), "0.0001");
        assert_eq!(f("%v", &[0.00001.into()]), "1e-05");
        assert_eq!(f("%v", &[0.0.into()]), "0");
        assert_eq!(f("%g", &[1.5.into()]), "1.5");
        assert_eq!(f("%.3g", &[1.23456.into()]), "1.23");
        assert_eq!(f("%.3g", &[1.0.into()]), "1");
        assert_eq!(f("%G", &[1e-7.into()]), "1E-07");
        assert_eq!(f("%v", &[0.1f32.into()]), "0.1");
    }

    #[test]
    fn test_float_fixed_and_exp() {
        assert_eq!(f("%f", &[3.5.into()]), "3.500000");
        assert_eq!(f("%.0f", &[2.7.into()]), "3");
        assert_eq!(f("%8.3f", &[(-1.23456).into()]), "  -1.235");
        assert_eq!(f("%08.3f", &[(-1.23456).into()]), "-001.235");
        assert_eq!(f("%+.1f", &[2.0.into()]), "+2.0");
        assert_eq!(f("%e", &[1234.5678.into()]), "1.234568e+03");
        assert_eq!(f("%.2E", &[0.000123.into()]), "1.23E-04");
    }

    #[test]
    fn test_float_special_values() {
        assert_eq!(f("%v", &[f64::NAN.into()]), "NaN");
        assert_eq!(f("%v", &[f64::INFINITY.into()]), "+Inf");
        assert_eq!(f("%f", &[f64::NEG_INFINITY.into()]), "-Inf");
    }

    #[test]
    fn test_integer_bases_and_padding() {
        assert_eq!(f("%5d|", &[42.into()]), "   42|");
        assert_eq!(f("%-5d|", &[42.into()]), "42   |");
        assert_eq!(f("%05d", &[(-42).into()]), "-0042");
        assert_eq!(f("%+d", &[7.into()]), "+7");
        assert_eq!(f("%.3d", &[7.into()]), "007");
        assert_eq!(f("%x", &[255.into()]), "ff");
        assert_eq!(f("%#X", &[255.into()]), "0XFF");
        assert_eq!(f("%x", &[(-255).into()]), "-ff");
        assert_eq!(f("%o", &[8.into()]), "10");
        assert_eq!(f("%#o", &[8.into()]), "010");
        assert_eq!(f("%b", &[5.into()]), "101");
        assert_eq!(f("%#b", &[5.into()]), "0b101");
    }

    #[test]
    fn test_chars_and_strings() {
        assert_eq!(f("%c", &[65.into()]), "A");
        assert_eq!(f("%U", &['é'.into()]), "U+00E9");
        assert_eq!(f("%d", &['A'.into()]), "65");
        assert_eq!(f("%q", &['\''.into()]), r"'\''");
        assert_eq!(f("%q", &["a\"b\n".into()]), r#""a\"b\n""#);
        assert_eq!(f("%.2s", &["hello".into()]), "he");
        assert_eq!(f("%6s|%-6s|", &["ab".into(), "cd".into()]), "    ab|cd    |");
        assert_eq!(f("%x", &["hi".into()]), "6869");
        assert_eq!(f("%s", &[serde_json::json!("inner").into()]), "inner");
    }

    #[test]
    fn test_bad_verb_missing_and_extra() {
        assert_eq!(f("%d", &["five".into()]), "%!d(string=five)");
        assert_eq!(f("%s", &[5.into()]), "%!s(int=5)");
        assert_eq!(f("%t", &[1.5.into()]), "%!t(float64=1.5)");
        assert_eq!(f("%s %s", &["a".into()]), "a %!s(MISSING)");
        assert_eq!(f("%s", &["a".into(), 1.into(), true.into()]), "a%!(EXTRA int=1, bool=true)");
        assert_eq!(f("end %", &["a".into()]), "end %!(NOVERB)%!(EXTRA string=a)");
    }

    #[test]
    fn test_display_arg() {
        let err = std::io::Error::other("disk full");
        assert_eq!(f("write failed: %v", &[Arg::display(&err)]), "write failed: disk full");
    }
}
