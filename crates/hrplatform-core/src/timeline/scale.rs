//! Linear year → pixel scale.

/// Maps a closed year domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over `[min - padding, max + padding]` of the given years.
    ///
    /// Returns `None` for an empty iterator.
    pub fn padded_extent(
        years: impl IntoIterator<Item = i32>,
        padding: i32,
        range: (f64, f64),
    ) -> Option<Self> {
        let (min, max) = year_extent(years)?;
        Some(Self::new(
            (f64::from(min - padding), f64::from(max + padding)),
            range,
        ))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Pixel position of `value`. A degenerate domain maps to the range start.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn year(&self, year: i32) -> f64 {
        self.apply(f64::from(year))
    }

    /// Domain value at pixel position `px`.
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// Smallest and largest year, or `None` when empty.
pub fn year_extent(years: impl IntoIterator<Item = i32>) -> Option<(i32, i32)> {
    years.into_iter().fold(None, |acc, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })
}

/// Axis ticks every `step` years from the first multiple of `step` at or
/// after `min`, up to but excluding `max + step`.
pub fn year_ticks(min: i32, max: i32, step: i32) -> Vec<i32> {
    if step <= 0 {
        return Vec::new();
    }
    let first = min.div_euclid(step) * step + if min.rem_euclid(step) == 0 { 0 } else { step };
    let end = max + step;
    (0..)
        .map(|i| first + i * step)
        .take_while(|y| *y < end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_onto_range() {
        let s = LinearScale::new((1900.0, 2000.0), (0.0, 1000.0));
        assert_eq!(s.year(1900), 0.0);
        assert_eq!(s.year(1950), 500.0);
        assert_eq!(s.year(2000), 1000.0);
        assert_eq!(s.invert(250.0), 1925.0);
    }

    #[test]
    fn degenerate_domain_maps_to_start() {
        let s = LinearScale::new((1948.0, 1948.0), (10.0, 20.0));
        assert_eq!(s.year(1948), 10.0);
    }

    #[test]
    fn padded_extent_uses_min_and_max() {
        let s = LinearScale::padded_extent([1966, 1215, 2006], 30, (0.0, 100.0)).unwrap();
        assert_eq!(s.domain(), (1185.0, 2036.0));
        assert!(LinearScale::padded_extent(Vec::new(), 30, (0.0, 1.0)).is_none());
    }

    #[test]
    fn ticks_start_at_next_multiple() {
        assert_eq!(year_ticks(1215, 1350, 50), vec![1250, 1300, 1350]);
        assert_eq!(year_ticks(1900, 1949, 50), vec![1900, 1950]);
        assert!(year_ticks(1900, 1949, 0).is_empty());
    }
}
