//! The long-lived, aggregated position record and the policy that selects
//! one authoritative reading out of a batch of buffered sentences.

use std::fmt;

use chrono::NaiveDateTime;

use parser::{self, DateString, ParsedFix, TimeString, NO_DIRECTION};

/// The aggregated position/time/fix record the receive core exposes.
///
/// Created once with sentinel values and mutated only by the aggregation
/// pass; it outlives every buffered sentence and every [`ParsedFix`].
/// Callers must check [`quality`](#method.quality) before trusting the
/// other accessors: without a fix, `location` and `date_time` keep
/// returning the text of the last good fix and `altitude` returns `-1.0`.
///
/// [`ParsedFix`]: parser/struct.ParsedFix.html
#[derive(Debug, Clone)]
pub struct PositionState {
    lat: f64,
    lat_dir: char,
    lon: f64,
    lon_dir: char,
    alt: f64,
    utc_time: TimeString,
    date: DateString,
    quality: u8,
    // display texts of the last good fix, refreshed whenever one is
    // absorbed; what the accessors hand out while the quality is 0
    location_text: String,
    date_time_text: String,
}

impl PositionState {
    pub fn new() -> PositionState {
        PositionState {
            lat: 0.0,
            lat_dir: NO_DIRECTION,
            lon: 0.0,
            lon_dir: NO_DIRECTION,
            alt: 0.0,
            utc_time: parser::sentinel_time(),
            date: parser::sentinel_date(),
            quality: 0,
            location_text: String::new(),
            date_time_text: String::new(),
        }
    }

    /// Fold a batch of framed sentences into the record.
    ///
    /// Sentences are scanned in buffer order and the first one carrying a
    /// non-zero quality wins; the rest of the batch is not looked at. The
    /// quality itself is copied from *every* scanned sentence though, so a
    /// batch without any valid fix leaves the quality of its last sentence
    /// behind (typically 0) while the previous good position text stays
    /// readable. That matches the fielded behavior this crate replaces and
    /// is pinned by a test.
    pub fn aggregate<'a, I>(&mut self, sentences: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for sentence in sentences {
            let fix = parser::parse(sentence);

            self.quality = fix.quality;
            if fix.quality != 0 {
                self.absorb(&fix);
                break;
            }
        }
    }

    /// Copy a valid fix into the record and refresh the display texts.
    fn absorb(&mut self, fix: &ParsedFix) {
        self.lat = fix.lat;
        self.lat_dir = fix.lat_dir;
        self.lon = fix.lon;
        self.lon_dir = fix.lon_dir;
        self.utc_time = fix.utc_time;

        // GGA sentences carry no date; keep the one last seen
        if !fix.date.is_empty() {
            self.date = fix.date;
        }
        // an absent altitude parses as 0, which must not wipe a real one
        if fix.alt != 0.0 {
            self.alt = fix.alt;
        }

        self.location_text = format!(
            "{:.6} {}, {:.6} {}",
            self.lat, self.lat_dir, self.lon, self.lon_dir
        );
        self.date_time_text = format!("{} {} UTC", self.date, self.utc_time);
    }

    /// Quality of the last scanned sentence; `0` means no fix.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// The fix position as `"<lat> <dir>, <lon> <dir>"`.
    ///
    /// Stale-read semantics: while the quality is 0 this keeps returning
    /// the text of the last good fix, or the empty string if there never
    /// was one.
    pub fn location(&self) -> String {
        self.location_text.clone()
    }

    /// The fix instant as `"DD.MM.YYYY HH:MM:SS UTC"`, under the same
    /// staleness rule as [`location`](#method.location).
    pub fn date_time(&self) -> String {
        self.date_time_text.clone()
    }

    /// Altitude of the current fix in meters, or `-1.0` without a fix.
    pub fn altitude(&self) -> f64 {
        if self.quality != 0 {
            self.alt
        } else {
            -1.0
        }
    }

    /// The fix instant as a typed value, `None` without a current fix.
    pub fn fix_datetime(&self) -> Option<NaiveDateTime> {
        if self.quality == 0 {
            return None;
        }
        let text = format!("{} {}", self.date, self.utc_time);
        NaiveDateTime::parse_from_str(&text, "%d.%m.%Y %H:%M:%S").ok()
    }
}

impl Default for PositionState {
    fn default() -> PositionState {
        PositionState::new()
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.quality == 0 {
            return write!(f, "no fix");
        }
        write!(
            f,
            "{}, {:.1} m, {}",
            self.location_text, self.alt, self.date_time_text
        )
    }
}
