//! printf-style template substitution
//!
//! Templates use `%` verbs (`%s`, `%d`, `%v`, `%5.2f`, ...). Substitution
//! never fails: a verb that does not fit its argument, a missing argument,
//! an unknown verb or leftover arguments all render as visible markers in
//! the output instead.
//!
//! | Situation        | Output                          |
//! |------------------|---------------------------------|
//! | missing argument | `%!d(MISSING)`                  |
//! | wrong type       | `%!d(string=abc)`               |
//! | unknown verb     | `%!z(int=3)`                    |
//! | extra arguments  | `%!(EXTRA int=3, string=x)`     |
//! | dangling `%`     | `%!(NOVERB)`                    |

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A substitution argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// A sequence; unpacked one level when it is the only argument
    List(Vec<Arg>),
    Value(serde_json::Value),
}

impl Arg {
    /// Type label used inside degradation markers.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "int",
            Arg::Uint(_) => "uint",
            Arg::Float(_) => "float64",
            Arg::Bool(_) => "bool",
            Arg::List(_) => "list",
            Arg::Value(_) => "json",
        }
    }

    /// Default rendering, the one `%v` produces.
    fn plain(&self) -> String {
        match self {
            Arg::Str(s) => s.clone(),
            Arg::Int(i) => i.to_string(),
            Arg::Uint(u) => u.to_string(),
            Arg::Float(f) => f.to_string(),
            Arg::Bool(b) => b.to_string(),
            Arg::List(items) => {
                let inner: Vec<String> = items.iter().map(Arg::plain).collect();
                format!("[{}]", inner.join(" "))
            }
            Arg::Value(value) => value.to_string(),
        }
    }

    fn bad_verb(&self, verb: char) -> String {
        format!("%!{}({}={})", verb, self.type_name(), self.plain())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<char> for Arg {
    fn from(c: char) -> Self {
        Arg::Str(c.to_string())
    }
}

macro_rules! arg_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        }
    )*};
}

macro_rules! arg_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        }
    )*};
}

arg_from_signed!(i8, i16, i32, i64, isize);
arg_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Self {
        Arg::Value(v)
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::List(items.into_iter().map(Into::into).collect())
    }
}

/// Unpack a lone `List` argument (varargs forwarded by a wrapper).
///
/// A list passed next to other arguments is a value of its own and stays
/// intact.
pub fn flatten_args(args: &[Arg]) -> Vec<Arg> {
    match args {
        [Arg::List(items)] => items.clone(),
        _ => args.to_vec(),
    }
}

/// Widths and precisions above this are rejected, as Go's fmt does.
const MAX_WIDTH: usize = 1_000_000;

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
    fn pad(&self, body: String, numeric: bool) -> String {
        let width = match self.width {
            Some(w) if w > body.chars().count() => w,
            _ => return body,
        };
        let fill = width - body.chars().count();
        if self.minus {
            return format!("{}{}", body, " ".repeat(fill));
        }
        if self.zero && numeric {
            // zeros go after the sign
            let (sign, digits) = match body.chars().next() {
                Some(c @ ('-' | '+' | ' ')) => (c.to_string(), body[1..].to_string()),
                _ => (String::new(), body),
            };
            return format!("{}{}{}", sign, "0".repeat(fill), digits);
        }
        format!("{}{}", " ".repeat(fill), body)
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
}

/// Substitute `args` into `template`.
pub fn sprintf(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

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
        if spec.width.is_some_and(|w| w > MAX_WIDTH) {
            out.push_str("%!(BADWIDTH)");
            spec.width = None;
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = read_number(&mut chars).unwrap_or(0);
            if precision > MAX_WIDTH {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let verb = match chars.next() {
            Some(v) => v,
            None => {
                out.push_str("%!(NOVERB)");
                break;
            }
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                out.push_str(&format_arg(arg, verb, &spec));
            }
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        let extras: Vec<String> = args[next_arg..]
            .iter()
            .map(|arg| format!("{}={}", arg.type_name(), arg.plain()))
            .collect();
        let _ = write!(out, "%!(EXTRA {})", extras.join(", "));
    }

    out
}

fn read_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

fn format_arg(arg: &Arg, verb: char, spec: &Spec) -> String {
    match verb {
        'v' => format_value(arg, spec),
        's' => match arg {
            Arg::Str(s) => spec.pad(truncate(s, spec.precision), false),
            Arg::List(_) | Arg::Value(_) => spec.pad(arg.plain(), false),
            _ => arg.bad_verb(verb),
        },
        'q' => match arg {
            Arg::Str(s) => spec.pad(quote(s), false),
            Arg::Int(i) => match u32::try_from(*i).ok().and_then(char::from_u32) {
                Some(c) => spec.pad(format!("'{}'", c), false),
                None => arg.bad_verb(verb),
            },
            _ => arg.bad_verb(verb),
        },
        'd' | 'b' | 'o' | 'x' | 'X' | 'c' => format_integer(arg, verb, spec),
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => match arg {
            Arg::Float(f) => format_float(*f, verb, spec),
            _ => arg.bad_verb(verb),
        },
        't' => match arg {
            Arg::Bool(b) => spec.pad(b.to_string(), false),
            _ => arg.bad_verb(verb),
        },
        _ => arg.bad_verb(verb),
    }
}

fn format_value(arg: &Arg, spec: &Spec) -> String {
    match arg {
        Arg::Str(s) if spec.sharp => spec.pad(quote(s), false),
        Arg::Int(_) | Arg::Uint(_) => format_integer(arg, 'd', spec),
        Arg::Float(f) if spec.precision.is_some() => format_float(*f, 'g', spec),
        _ => spec.pad(arg.plain(), false),
    }
}

fn format_integer(arg: &Arg, verb: char, spec: &Spec) -> String {
    let (negative, magnitude) = match arg {
        Arg::Int(i) => (*i < 0, i.unsigned_abs()),
        Arg::Uint(u) => (false, *u),
        Arg::Str(s) if matches!(verb, 'x' | 'X') => {
            let hex: String = s
                .bytes()
                .map(|b| {
                    if verb == 'x' {
                        format!("{:02x}", b)
                    } else {
                        format!("{:02X}", b)
                    }
                })
                .collect();
            return spec.pad(hex, false);
        }
        _ => return arg.bad_verb(verb),
    };

    let digits = match verb {
        'd' => magnitude.to_string(),
        'b' => format!("{:b}", magnitude),
        'o' if spec.sharp => format!("0{:o}", magnitude),
        'o' => format!("{:o}", magnitude),
        'x' if spec.sharp => format!("0x{:x}", magnitude),
        'x' => format!("{:x}", magnitude),
        'X' if spec.sharp => format!("0X{:X}", magnitude),
        'X' => format!("{:X}", magnitude),
        'c' => {
            return match u32::try_from(magnitude).ok().and_then(char::from_u32) {
                Some(c) if !negative => spec.pad(c.to_string(), false),
                _ => arg.bad_verb(verb),
            };
        }
        _ => return arg.bad_verb(verb),
    };

    let digits = match spec.precision {
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    };
    spec.pad(format!("{}{}", spec.sign(negative), digits), true)
}

fn format_float(value: f64, verb: char, spec: &Spec) -> String {
    if value.is_nan() {
        return spec.pad("NaN".to_string(), false);
    }
    if value.is_infinite() {
        let body = if value < 0.0 { "-Inf" } else { "+Inf" };
        return spec.pad(body.to_string(), false);
    }

    let negative = value.is_sign_negative() && value != 0.0;
    let magnitude = value.abs();
    let body = match verb {
        'f' | 'F' => format!("{:.*}", spec.precision.unwrap_or(6), magnitude),
        'e' | 'E' => {
            let raw = exponent(magnitude, spec.precision.unwrap_or(6));
            if verb == 'E' {
                raw.to_uppercase()
            } else {
                raw
            }
        }
        _ => {
            let raw = match spec.precision {
                Some(p) => {
                    let exp = if magnitude == 0.0 {
                        0
                    } else {
                        magnitude.log10().floor() as i32
                    };
                    let p = p.max(1);
                    if exp < -4 || exp >= p as i32 {
                        trim_exponent_zeros(&exponent(magnitude, p - 1))
                    } else {
                        let decimals = (p as i32 - 1 - exp).max(0) as usize;
                        trim_fraction(&format!("{:.*}", decimals, magnitude))
                    }
                }
                None => magnitude.to_string(),
            };
            if verb == 'G' {
                raw.to_uppercase()
            } else {
                raw
            }
        }
    };
    spec.pad(format!("{}{}", spec.sign(negative), body), true)
}

/// `1.500000e+00` style exponent notation.
fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn trim_exponent_zeros(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
        None => s.to_string(),
    }
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: Vec<Arg>) -> Vec<Arg> {
        list
    }

    #[test]
    fn test_basic_substitution() {
        assert_eq!(sprintf("%d items", &[Arg::from(3)]), "3 items");
        assert_eq!(sprintf("bad: %s", &[Arg::from("oops")]), "bad: oops");
        assert_eq!(sprintf("%v and %v", &[1.into(), true.into()]), "1 and true");
        assert_eq!(sprintf("100%%", &[]), "100%");
    }

    #[test]
    fn test_width_precision_and_flags() {
        assert_eq!(sprintf("[%5d]", &[42.into()]), "[   42]");
        assert_eq!(sprintf("[%-5d]", &[42.into()]), "[42   ]");
        assert_eq!(sprintf("[%05d]", &[(-42).into()]), "[-0042]");
        assert_eq!(sprintf("%+d", &[7.into()]), "+7");
        assert_eq!(sprintf("%.2f", &[3.14159.into()]), "3.14");
        assert_eq!(sprintf("%8.3f|", &[2.5.into()]), "   2.500|");
        assert_eq!(sprintf("%.3s", &["abcdef".into()]), "abc");
        assert_eq!(sprintf("%3d|", &[200.into()]), "200|");
    }

    #[test]
    fn test_numeric_verbs() {
        assert_eq!(sprintf("%x %X %o %b", &[255.into(), 255.into(), 8.into(), 5.into()]), "ff FF 10 101");
        assert_eq!(sprintf("%#x", &[255.into()]), "0xff");
        assert_eq!(sprintf("%c", &[65.into()]), "A");
        assert_eq!(sprintf("%x", &["hi".into()]), "6869");
        assert_eq!(sprintf("%e", &[1.5.into()]), "1.500000e+00");
        assert_eq!(sprintf("%.2e", &[12345.678.into()]), "1.23e+04");
        assert_eq!(sprintf("%f", &[1.0.into()]), "1.000000");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(sprintf("%q", &["a\"b".into()]), "\"a\\\"b\"");
        assert_eq!(sprintf("%#v", &["/users".into()]), "\"/users\"");
        assert_eq!(sprintf("%t", &[false.into()]), "false");
    }

    #[test]
    fn test_missing_argument_marker() {
        assert_eq!(sprintf("%s and %d", &["a".into()]), "a and %!d(MISSING)");
    }

    #[test]
    fn test_extra_arguments_marker() {
        assert_eq!(
            sprintf("hello", &args(vec![3.into(), "x".into()])),
            "hello%!(EXTRA int=3, string=x)"
        );
    }

    #[test]
    fn test_wrong_type_and_unknown_verb_markers() {
        assert_eq!(sprintf("%d", &["abc".into()]), "%!d(string=abc)");
        assert_eq!(sprintf("%s", &[3.into()]), "%!s(int=3)");
        assert_eq!(sprintf("%z", &[3.into()]), "%!z(int=3)");
        assert_eq!(sprintf("%f", &[3.into()]), "%!f(int=3)");
    }

    #[test]
    fn test_dangling_percent() {
        assert_eq!(sprintf("50%", &[]), "50%!(NOVERB)");
    }

    #[test]
    fn test_structured_arguments() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(sprintf("%v", &[value.clone().into()]), "{\"a\":1}");
        assert_eq!(sprintf("%s", &[value.into()]), "{\"a\":1}");
        assert_eq!(sprintf("%v", &[vec![1, 2, 3].into()]), "[1 2 3]");
    }

    #[test]
    fn test_flatten_lone_list_one_level() {
        let forwarded = vec![Arg::List(vec![1.into(), Arg::List(vec![2.into()])])];
        let flat = flatten_args(&forwarded);
        assert_eq!(flat, vec![Arg::Int(1), Arg::List(vec![Arg::Int(2)])]);
    }

    #[test]
    fn test_list_beside_other_args_stays_whole() {
        let mixed = vec!["x".into(), Arg::List(vec![1.into(), 2.into()])];
        assert_eq!(flatten_args(&mixed), mixed);
        assert_eq!(sprintf("%s %v", &flatten_args(&mixed)), "x [1 2]");
    }

    #[test]
    fn test_oversized_width_and_precision_are_rejected() {
        assert_eq!(
            sprintf("bad input %18446744073709551615d", &[1.into()]),
            "bad input %!(BADWIDTH)1"
        );
        assert_eq!(sprintf("%1000000000000s|", &["x".into()]), "%!(BADWIDTH)x|");
        assert_eq!(sprintf("%.99999999999f", &[1.5.into()]), "%!(BADPREC)1.500000");
        assert_eq!(sprintf("%.18446744073709551615s", &["abc".into()]), "%!(BADPREC)abc");
        assert_eq!(sprintf("%3d", &[7.into()]), "  7");
    }

    #[test]
    fn test_general_float_verb() {
        assert_eq!(sprintf("%v", &[2.5.into()]), "2.5");
        assert_eq!(sprintf("%.3g", &[3.14159.into()]), "3.14");
        assert_eq!(sprintf("%.3g", &[0.00001234.into()]), "1.23e-05");
    }
}
