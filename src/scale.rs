use crate::error::ScaleError;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday};

// Thresholds for picking 1/2/5/10 tick steps
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

// =============================================================================
// Band Scale
// =============================================================================

/// Categorical → pixel mapping. Each key owns one equal slot of the range;
/// padding is taken as a fraction of the slot step.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
}

impl<K: PartialEq + Clone> BandScale<K> {
    /// Duplicate keys are dropped; the first appearance fixes the slot order.
    pub fn new<I>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut keys: Vec<K> = Vec::new();
        for key in domain {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self {
            domain: keys,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    /// Set inner and outer padding to the same fraction in [0, 1)
    pub fn with_padding(mut self, padding: f64) -> Result<Self, ScaleError> {
        if !(0.0..1.0).contains(&padding) {
            return Err(ScaleError::InvalidPadding(padding));
        }
        self.padding_inner = padding;
        self.padding_outer = padding;
        Ok(self)
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns (start, step, bandwidth) over the ascending range
    fn layout(&self) -> (f64, f64, f64) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (mut start, stop) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        start += (stop - start - step * (n - self.padding_inner)) * self.align;
        let bandwidth = step * (1.0 - self.padding_inner);
        (start, step, bandwidth)
    }

    pub fn step(&self) -> f64 {
        self.layout().1
    }

    /// Width shared by every band; nested band scales use it as their range.
    pub fn bandwidth(&self) -> f64 {
        self.layout().2
    }

    /// Start coordinate of the key's band
    pub fn position(&self, key: &K) -> Option<f64> {
        let idx = self.domain.iter().position(|k| k == key)?;
        let (start, step, _) = self.layout();
        let slot = if self.range.1 < self.range.0 {
            self.domain.len() - 1 - idx
        } else {
            idx
        };
        Some(start + step * slot as f64)
    }

    pub fn center(&self, key: &K) -> Option<f64> {
        self.position(key).map(|p| p + self.bandwidth() / 2.0)
    }
}

// =============================================================================
// Linear Scale
// =============================================================================

/// Affine numeric → pixel mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Strict constructor: a zero-width or non-finite domain is an error.
    pub fn try_new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        let (d0, d1) = domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return Err(ScaleError::DegenerateDomain { min: d0, max: d1 });
        }
        Ok(Self { domain, range })
    }

    /// Lenient constructor: a degenerate domain maps every value to the
    /// midpoint of the range.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        let span = self.domain.1 - self.domain.0;
        span == 0.0 || !span.is_finite()
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Inverse mapping; a degenerate scale inverts to the domain start.
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() || r0 == r1 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to round tick multiples
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        if self.is_degenerate() || count == 0 {
            return self;
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if previous == Some(step) {
                let domain = if reversed { (stop, start) } else { (start, stop) };
                return Self { domain, ..self };
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Distance between adjacent ticks for `count`
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count)
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        // Negative increments encode 1/inc to keep decimal ticks exact
        inc = -scale;
    } else {
        let scale = 10f64.powf(power) * factor;
        i1 = (start / scale).round();
        i2 = (stop / scale).round();
        if i1 * scale < start {
            i1 += 1.0;
        }
        if i2 * scale > stop {
            i2 -= 1.0;
        }
        inc = scale;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Signed distance between adjacent ticks
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count as f64)
    } else {
        tick_increment(start, stop, count as f64)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Roughly `count` round values in [start, stop], in domain order
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count as f64)
    } else {
        tick_spec(start, stop, count as f64)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    (0..n)
        .map(|i| {
            let k = if reverse { i2 - i as f64 } else { i1 + i as f64 };
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// Format a tick value with as many decimals as the tick step needs and
/// comma thousands separators.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step != 0.0 {
        (-step.abs().log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let text = format!("{:.*}", decimals, value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) if rest.chars().any(|c| c.is_ascii_digit() && c != '0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

// =============================================================================
// Time Scale
// =============================================================================

/// Calendar interval used for time ticks and nice domains.
/// The count is the stride in units of the variant (e.g. `Hour(3)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInterval {
    Second(u32),
    Minute(u32),
    Hour(u32),
    Day(u32),
    Week,
    Month(u32),
    Year(u32),
}

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = SECOND_MS * 60.0;
const HOUR_MS: f64 = MINUTE_MS * 60.0;
const DAY_MS: f64 = HOUR_MS * 24.0;
const WEEK_MS: f64 = DAY_MS * 7.0;
const MONTH_MS: f64 = DAY_MS * 30.0;
const YEAR_MS: f64 = DAY_MS * 365.0;

const TICK_INTERVALS: [(TimeInterval, f64); 17] = [
    (TimeInterval::Second(1), SECOND_MS),
    (TimeInterval::Second(5), 5.0 * SECOND_MS),
    (TimeInterval::Second(15), 15.0 * SECOND_MS),
    (TimeInterval::Second(30), 30.0 * SECOND_MS),
    (TimeInterval::Minute(1), MINUTE_MS),
    (TimeInterval::Minute(5), 5.0 * MINUTE_MS),
    (TimeInterval::Minute(15), 15.0 * MINUTE_MS),
    (TimeInterval::Minute(30), 30.0 * MINUTE_MS),
    (TimeInterval::Hour(1), HOUR_MS),
    (TimeInterval::Hour(3), 3.0 * HOUR_MS),
    (TimeInterval::Hour(6), 6.0 * HOUR_MS),
    (TimeInterval::Hour(12), 12.0 * HOUR_MS),
    (TimeInterval::Day(1), DAY_MS),
    (TimeInterval::Day(2), 2.0 * DAY_MS),
    (TimeInterval::Week, WEEK_MS),
    (TimeInterval::Month(1), MONTH_MS),
    (TimeInterval::Month(3), 3.0 * MONTH_MS),
];

// Upper bound on generated ticks; guards against pathological domains
const MAX_TICKS: usize = 1_000;

impl TimeInterval {
    /// Pick the interval whose duration is closest to `span / count`
    pub fn for_span(start: NaiveDateTime, stop: NaiveDateTime, count: usize) -> Self {
        let (lo, hi) = ordered(to_millis(start), to_millis(stop));
        let target = (hi - lo) / count.max(1) as f64;

        let i = TICK_INTERVALS.partition_point(|(_, duration)| *duration <= target);
        if i == TICK_INTERVALS.len() {
            let step = tick_step(lo / YEAR_MS, hi / YEAR_MS, count).abs().round().max(1.0);
            return TimeInterval::Year(step as u32);
        }
        if i == 0 {
            return TimeInterval::Second(1);
        }
        let (below, below_ms) = TICK_INTERVALS[i - 1];
        let (above, above_ms) = TICK_INTERVALS[i];
        if target / below_ms < above_ms / target {
            below
        } else {
            above
        }
    }

    /// Truncate to the interval's base unit (second, minute, ..., year)
    fn floor_unit(&self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        match self {
            TimeInterval::Second(_) => t.with_nanosecond(0).unwrap_or(t),
            TimeInterval::Minute(_) => at(date, t.hour(), t.minute(), 0),
            TimeInterval::Hour(_) => at(date, t.hour(), 0, 0),
            TimeInterval::Day(_) => at(date, 0, 0, 0),
            TimeInterval::Week => {
                let back = date.weekday().num_days_from_sunday() as i64;
                at(date - TimeDelta::days(back), 0, 0, 0)
            }
            TimeInterval::Month(_) => at(date.with_day(1).unwrap_or(date), 0, 0, 0),
            TimeInterval::Year(_) => {
                at(NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date), 0, 0, 0)
            }
        }
    }

    /// Move by `n` base units
    fn shift(&self, t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        match self {
            TimeInterval::Second(_) => t.checked_add_signed(TimeDelta::try_seconds(n)?),
            TimeInterval::Minute(_) => t.checked_add_signed(TimeDelta::try_minutes(n)?),
            TimeInterval::Hour(_) => t.checked_add_signed(TimeDelta::try_hours(n)?),
            TimeInterval::Day(_) => t.checked_add_signed(TimeDelta::try_days(n)?),
            TimeInterval::Week => t.checked_add_signed(TimeDelta::try_weeks(n)?),
            TimeInterval::Month(_) => shift_months(t, n),
            TimeInterval::Year(_) => shift_months(t, n * 12),
        }
    }

    /// Whether a unit-aligned instant is one of this interval's boundaries
    fn accepts(&self, t: NaiveDateTime) -> bool {
        match *self {
            TimeInterval::Second(k) => t.second() % k.max(1) == 0,
            TimeInterval::Minute(k) => t.minute() % k.max(1) == 0,
            TimeInterval::Hour(k) => t.hour() % k.max(1) == 0,
            TimeInterval::Day(k) => t.day0() % k.max(1) == 0,
            TimeInterval::Week => true,
            TimeInterval::Month(k) => t.month0() % k.max(1) == 0,
            TimeInterval::Year(k) => t.year().rem_euclid(k.max(1) as i32) == 0,
        }
    }

    /// Latest boundary at or before `t`
    pub fn floor(&self, t: NaiveDateTime) -> NaiveDateTime {
        let mut cur = self.floor_unit(t);
        for _ in 0..MAX_TICKS {
            if self.accepts(cur) {
                return cur;
            }
            match self.shift(cur, -1) {
                Some(prev) => cur = prev,
                None => break,
            }
        }
        cur
    }

    /// Earliest boundary at or after `t`
    pub fn ceil(&self, t: NaiveDateTime) -> NaiveDateTime {
        let mut cur = self.floor_unit(t);
        if cur < t {
            cur = self.shift(cur, 1).unwrap_or(cur);
        }
        for _ in 0..MAX_TICKS {
            if self.accepts(cur) {
                return cur;
            }
            match self.shift(cur, 1) {
                Some(next) => cur = next,
                None => break,
            }
        }
        cur
    }

    /// Every boundary in [start, stop]
    pub fn range(&self, start: NaiveDateTime, stop: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let mut cur = self.ceil(start);
        let mut visited = 0;
        while cur <= stop && out.len() < MAX_TICKS && visited < MAX_TICKS * 40 {
            if self.accepts(cur) {
                out.push(cur);
            }
            visited += 1;
            match self.shift(cur, 1) {
                Some(next) => cur = next,
                None => break,
            }
        }
        out
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN))
}

fn shift_months(t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n >= 0 {
        t.checked_add_months(months)
    } else {
        t.checked_sub_months(months)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

fn to_millis(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64
}

fn from_millis(ms: f64) -> NaiveDateTime {
    DateTime::from_timestamp_millis(ms.round() as i64)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}

/// Date → pixel mapping, affine over elapsed milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn try_new(
        domain: (NaiveDateTime, NaiveDateTime),
        range: (f64, f64),
    ) -> Result<Self, ScaleError> {
        LinearScale::try_new((to_millis(domain.0), to_millis(domain.1)), range)
            .map(|linear| Self { linear })
    }

    /// Lenient constructor; a single-instant domain maps to the range midpoint.
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f64, f64)) -> Self {
        Self {
            linear: LinearScale::new((to_millis(domain.0), to_millis(domain.1)), range),
        }
    }

    pub fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        let (d0, d1) = self.linear.domain();
        (from_millis(d0), from_millis(d1))
    }

    pub fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    pub fn is_degenerate(&self) -> bool {
        self.linear.is_degenerate()
    }

    pub fn map(&self, t: NaiveDateTime) -> f64 {
        self.linear.map(to_millis(t))
    }

    pub fn invert(&self, pixel: f64) -> NaiveDateTime {
        from_millis(self.linear.invert(pixel))
    }

    pub fn interval(&self, count: usize) -> TimeInterval {
        let (d0, d1) = self.domain();
        TimeInterval::for_span(d0, d1, count)
    }

    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let (d0, d1) = self.domain();
        if d0 == d1 {
            return vec![d0];
        }
        let (lo, hi) = if d1 < d0 { (d1, d0) } else { (d0, d1) };
        let mut out = self.interval(count).range(lo, hi);
        if d1 < d0 {
            out.reverse();
        }
        out
    }

    /// Extend the domain outward to boundaries of the tick interval
    pub fn nice(self, count: usize) -> Self {
        if self.is_degenerate() {
            return self;
        }
        let (d0, d1) = self.domain();
        let interval = self.interval(count);
        let domain = if d1 < d0 {
            (interval.ceil(d0), interval.floor(d1))
        } else {
            (interval.floor(d0), interval.ceil(d1))
        };
        Self::new(domain, self.range())
    }
}

/// Label for a time tick, picking the coarsest field that is not at its
/// boundary (seconds, then minutes, hours, days, months, years).
pub fn format_time_tick(t: NaiveDateTime) -> String {
    let fmt = if t.second() != 0 {
        ":%S"
    } else if t.minute() != 0 {
        "%I:%M"
    } else if t.hour() != 0 {
        "%I %p"
    } else if t.day() != 1 {
        if t.weekday() == Weekday::Sun {
            "%b %d"
        } else {
            "%a %d"
        }
    } else if t.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    t.format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_band_two_keys_no_padding() {
        let scale = BandScale::new(vec!["A", "B"], (0.0, 100.0))
            .with_padding(0.0)
            .unwrap();
        assert_eq!(scale.bandwidth(), 50.0);
        assert_eq!(scale.position(&"A"), Some(0.0));
        assert_eq!(scale.position(&"B"), Some(50.0));
        assert_eq!(scale.center(&"B"), Some(75.0));
        assert_eq!(scale.position(&"C"), None);
    }

    #[test]
    fn test_band_padding_and_dedup() {
        let scale = BandScale::new(vec!["A", "B", "A"], (0.0, 210.0))
            .with_padding(0.1)
            .unwrap();
        assert_eq!(scale.domain(), &["A", "B"]);
        // step = 210 / (2 - 0.1 + 0.2) = 100
        assert!((scale.step() - 100.0).abs() < 1e-9);
        assert!((scale.bandwidth() - 90.0).abs() < 1e-9);
        assert!((scale.position(&"A").unwrap() - 10.0).abs() < 1e-9);
        assert!((scale.position(&"B").unwrap() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_reversed_range() {
        let scale = BandScale::new(vec!["A", "B"], (100.0, 0.0));
        assert_eq!(scale.position(&"A"), Some(50.0));
        assert_eq!(scale.position(&"B"), Some(0.0));
    }

    #[test]
    fn test_band_invalid_padding() {
        let err = BandScale::new(vec!["A"], (0.0, 1.0)).with_padding(1.0).unwrap_err();
        assert_eq!(err, ScaleError::InvalidPadding(1.0));
    }

    #[test]
    fn test_nested_band() {
        let outer = BandScale::new(vec!["FB", "IG"], (0.0, 200.0));
        let inner = BandScale::new(vec!["Image", "Video"], (0.0, outer.bandwidth()));
        assert_eq!(inner.bandwidth(), 50.0);
        assert_eq!(outer.position(&"IG").unwrap() + inner.position(&"Video").unwrap(), 150.0);
    }

    #[test]
    fn test_linear_inverted_range() {
        let scale = LinearScale::try_new((0.0, 10.0), (100.0, 0.0)).unwrap();
        assert_eq!(scale.map(0.0), 100.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.map(5.0), 50.0);
        assert_eq!(scale.invert(50.0), 5.0);
    }

    #[test]
    fn test_linear_degenerate() {
        let err = LinearScale::try_new((5.0, 5.0), (0.0, 100.0)).unwrap_err();
        assert_eq!(err, ScaleError::DegenerateDomain { min: 5.0, max: 5.0 });

        let scale = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert!(scale.is_degenerate());
        assert_eq!(scale.map(5.0), 50.0);
        assert_eq!(scale.map(1000.0), 50.0);
        assert_eq!(scale.invert(12.0), 5.0);
        assert_eq!(scale.nice(10).domain(), (5.0, 5.0));
    }

    #[test]
    fn test_linear_nice() {
        let scale = LinearScale::new((0.0, 987.0), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 1000.0));

        let scale = LinearScale::new((0.13, 0.87), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain(), (0.1, 0.9));
    }

    #[test]
    fn test_ticks() {
        assert_eq!(
            ticks(0.0, 1000.0, 10),
            vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 900.0, 1000.0]
        );
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1500.0, 500.0), "1,500");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-1234567.0, 1.0), "-1,234,567");
        assert_eq!(format_tick(-0.0, 1.0), "0");
    }

    #[test]
    fn test_time_scale_map() {
        let scale = TimeScale::try_new((day(2024, 3, 1), day(2024, 3, 11)), (0.0, 100.0)).unwrap();
        assert_eq!(scale.map(day(2024, 3, 1)), 0.0);
        assert_eq!(scale.map(day(2024, 3, 6)), 50.0);
        assert_eq!(scale.map(day(2024, 3, 11)), 100.0);
        assert_eq!(scale.invert(50.0), day(2024, 3, 6));
    }

    #[test]
    fn test_time_scale_degenerate() {
        let d = day(2024, 3, 1);
        assert!(TimeScale::try_new((d, d), (0.0, 100.0)).is_err());
        let scale = TimeScale::new((d, d), (0.0, 100.0));
        assert_eq!(scale.map(d), 50.0);
        assert_eq!(scale.ticks(10), vec![d]);
    }

    #[test]
    fn test_time_ticks_daily() {
        let scale = TimeScale::new((day(2024, 3, 1), day(2024, 3, 7)), (0.0, 600.0));
        // Ten ticks over six days would be half-days
        assert_eq!(scale.interval(10), TimeInterval::Hour(12));
        assert_eq!(scale.interval(5), TimeInterval::Day(1));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0], day(2024, 3, 1));
        assert_eq!(ticks[6], day(2024, 3, 7));
    }

    #[test]
    fn test_time_ticks_monthly() {
        let scale = TimeScale::new((day(2024, 1, 15), day(2024, 12, 20)), (0.0, 600.0));
        assert_eq!(scale.interval(10), TimeInterval::Month(1));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&day(2024, 2, 1)));
        assert_eq!(ticks.last(), Some(&day(2024, 12, 1)));
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn test_time_nice() {
        let start = day(2024, 3, 1) + TimeDelta::hours(5);
        let stop = day(2024, 3, 7) + TimeDelta::hours(20);
        let scale = TimeScale::new((start, stop), (0.0, 600.0)).nice(10);
        assert_eq!(scale.domain(), (day(2024, 3, 1), day(2024, 3, 8)));
    }

    #[test]
    fn test_format_time_tick() {
        assert_eq!(format_time_tick(day(2024, 1, 1)), "2024");
        assert_eq!(format_time_tick(day(2024, 3, 1)), "March");
        assert_eq!(format_time_tick(day(2024, 3, 3)), "Mar 03");
        assert_eq!(format_time_tick(day(2024, 3, 4)), "Mon 04");
    }
}
