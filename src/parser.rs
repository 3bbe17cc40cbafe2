//! This module parses single, framed sentences of the *NMEA 0183* protocol
//! into the fields the receive core keeps: position, altitude, UTC time and
//! date, and fix quality. Only the *GGA* and *RMC* sentence types carry
//! those fields; everything else normalizes to a neutral no-fix record.

use std::fmt::Write;

use arrayvec::ArrayString;

use lexer::Tokenizer;

/// Field delimiters of a sentence. `*` starts the checksum, which is not
/// verified here, so the checksum digits simply become trailing fields that
/// no parse walk consumes.
pub const DELIMITERS: &[char] = &[',', '*'];

/// Formatted UTC time of a fix, `HH:MM:SS`.
pub type TimeString = ArrayString<8>;
/// Formatted UTC date of a fix, `DD.MM.YYYY`.
pub type DateString = ArrayString<10>;

/// Hemisphere placeholder before a direction field has been read.
pub const NO_DIRECTION: char = '0';

/// The sentence types the parser understands, chosen once from the
/// identifier field. Receivers emit the identifier with either a single `$`
/// or a doubled `$$` prefix; both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    /// `$GPGGA`: fix data (position, altitude, quality).
    Gga,
    /// `$GPRMC`: recommended minimum (position, validity, date).
    Rmc,
    /// Anything else, parsed as a neutral no-fix record.
    Unsupported,
}

impl SentenceKind {
    /// Classify an identifier field such as `"$GPGGA"`.
    pub fn from_ident(ident: &str) -> SentenceKind {
        let tag = if ident.starts_with("$$") {
            &ident[2..]
        } else if ident.starts_with('$') {
            &ident[1..]
        } else {
            return SentenceKind::Unsupported;
        };
        match tag {
            "GPGGA" => SentenceKind::Gga,
            "GPRMC" => SentenceKind::Rmc,
            _ => SentenceKind::Unsupported,
        }
    }
}

/// One decoded sentence. Short-lived: the aggregation policy in
/// [`PositionState`](../struct.PositionState.html) folds these into the
/// long-lived record and throws them away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedFix {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Hemisphere of the latitude, `N`/`S`, or [`NO_DIRECTION`](constant.NO_DIRECTION.html).
    pub lat_dir: char,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Hemisphere of the longitude, `E`/`W`, or the placeholder.
    pub lon_dir: char,
    /// Altitude above mean sea level in meters.
    pub alt: f64,
    /// UTC time of the fix, empty until the sentence provided one.
    pub utc_time: TimeString,
    /// UTC date of the fix, empty until the sentence provided one.
    pub date: DateString,
    /// Fix quality; `0` means no fix.
    pub quality: u8,
}

impl Default for ParsedFix {
    fn default() -> ParsedFix {
        ParsedFix {
            lat: 0.0,
            lat_dir: NO_DIRECTION,
            lon: 0.0,
            lon_dir: NO_DIRECTION,
            alt: 0.0,
            utc_time: TimeString::new(),
            date: DateString::new(),
            quality: 0,
        }
    }
}

/// Parse one framed sentence.
///
/// Parsing is deliberately lenient: non-numeric text in a numeric field
/// reads as zero, missing fields read as empty ones and an unsupported
/// identifier yields the neutral record with sentinel time and date. No
/// input fails the surrounding aggregation pass.
///
/// Note that RMC dates carry a two-digit year; the century is fixed to
/// `20YY`, a known limitation.
pub fn parse(sentence: &str) -> ParsedFix {
    let mut fields = Tokenizer::new(sentence, DELIMITERS);
    let mut fix = ParsedFix::default();

    match SentenceKind::from_ident(next_field!(fields)) {
        SentenceKind::Gga => parse_gga(&mut fields, &mut fix),
        SentenceKind::Rmc => parse_rmc(&mut fields, &mut fix),
        SentenceKind::Unsupported => {
            fix.utc_time = sentinel_time();
            fix.date = sentinel_date();
        }
    }

    fix
}

/// Walk the fields of a GGA sentence. The identifier field has already been
/// consumed.
fn parse_gga(fields: &mut Tokenizer, fix: &mut ParsedFix) {
    // Time of fix
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.utc_time = format_time(int_prefix(field) as u32);
    }

    // Latitude and longitude, each followed by its hemisphere
    if let Some((lat, dir)) = parse_coord(fields) {
        fix.lat = lat;
        fix.lat_dir = dir;
    }
    if let Some((lon, dir)) = parse_coord(fields) {
        fix.lon = lon;
        fix.lon_dir = dir;
    }

    // Quality of fix: 0 = invalid, 1 = autonomous, 2 = differential,
    // anything above that is some augmented mode
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.quality = int_prefix(field) as u8;
    }

    fields.next(); // satellites in view
    fields.next(); // horizontal dilution of precision

    // Altitude
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.alt = float_prefix(field);
    }
}

/// Walk the fields of an RMC sentence. The identifier field has already
/// been consumed.
fn parse_rmc(fields: &mut Tokenizer, fix: &mut ParsedFix) {
    // Time of fix
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.utc_time = format_time(int_prefix(field) as u32);
    }

    // Status: "V" marks the data invalid, anything else counts as a fix
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.quality = if field == "V" { 0 } else { 1 };
    }

    if let Some((lat, dir)) = parse_coord(fields) {
        fix.lat = lat;
        fix.lat_dir = dir;
    }
    if let Some((lon, dir)) = parse_coord(fields) {
        fix.lon = lon;
        fix.lon_dir = dir;
    }

    fields.next(); // speed over ground
    fields.next(); // course over ground

    // Date of fix
    let field = next_field!(fields);
    if !field.is_empty() {
        fix.date = format_date(int_prefix(field) as u32);
    }
}

/// Parse a coordinate field plus its hemisphere field.
///
/// Coordinates come in degrees-and-decimal-minutes form (`DDMM.MMMM` for
/// latitude, `DDDMM.MMMM` for longitude) and convert to decimal degrees.
/// An empty coordinate still advances past the hemisphere field that
/// follows it, so the walk stays aligned.
fn parse_coord(fields: &mut Tokenizer) -> Option<(f64, char)> {
    let field = next_field!(fields);
    if field.is_empty() {
        fields.next(); // jump over the hemisphere of the missing value
        return None;
    }

    let degrees = ((int_prefix(field) / 100) % 100) as f64;
    let minutes = float_prefix(field) - degrees * 100.0;
    let dir = next_field!(fields).chars().next().unwrap_or(NO_DIRECTION);

    Some((degrees + minutes / 60.0, dir))
}

/// Format an `HHMMSS` integer as `HH:MM:SS`.
fn format_time(time: u32) -> TimeString {
    let mut buf = TimeString::new();
    // every component is an unsigned value taken modulo 100, so the text
    // always fits
    write!(
        buf,
        "{:02}:{:02}:{:02}",
        (time / 10_000) % 100,
        (time / 100) % 100,
        time % 100
    ).unwrap();
    buf
}

/// Format a `DDMMYY` integer as `DD.MM.20YY`.
fn format_date(date: u32) -> DateString {
    let mut buf = DateString::new();
    write!(
        buf,
        "{:02}.{:02}.20{:02}",
        (date / 10_000) % 100,
        (date / 100) % 100,
        date % 100
    ).unwrap();
    buf
}

pub(crate) fn sentinel_time() -> TimeString {
    let mut buf = TimeString::new();
    buf.push_str("00:00:00");
    buf
}

pub(crate) fn sentinel_date() -> DateString {
    let mut buf = DateString::new();
    buf.push_str("00.00.0000");
    buf
}

/// The longest leading integer of a field, anything unparseable reading as
/// zero. This mirrors `atoi`: `"123519.00"` is `123519`, `"abc"` is `0`.
fn int_prefix(field: &str) -> i64 {
    let field = field.trim_start();
    let mut end = 0;
    for (i, c) in field.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => end = i + 1,
            _ => break,
        }
    }
    field[..end].parse().unwrap_or(0)
}

/// The longest leading decimal number of a field, anything unparseable
/// reading as zero. Eats digits, at most one dot, then digits, like the
/// `atof` of the wire format's native habitat.
fn float_prefix(field: &str) -> f64 {
    let field = field.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in field.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }
    field[..end].parse().unwrap_or(0.0)
}
