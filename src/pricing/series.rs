/// Padding added on both sides of the record time span, in seconds.
pub const RANGE_PADDING_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: u64,
    pub price_usd: f64,
}

/// Unix-second range a price series is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub from: u64,
    pub to: u64,
}

impl PriceRange {
    /// Span of `timestamps` padded by an hour each side, or `None` when empty.
    pub fn covering<I>(timestamps: I) -> Option<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let (min, max) = timestamps.into_iter().fold(None, |acc, ts| match acc {
            None => Some((ts, ts)),
            Some((min, max)) => Some((u64::min(min, ts), u64::max(max, ts))),
        })?;

        Some(Self {
            from: min.saturating_sub(RANGE_PADDING_SECS),
            to: max.saturating_add(RANGE_PADDING_SECS),
        })
    }
}

/// Historical USD prices, ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        // Stable, so duplicate timestamps keep upstream order
        points.sort_by_key(|p| p.timestamp_ms);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Price closest in time to `timestamp_secs`. Ties go to the later sample.
    pub fn nearest(&self, timestamp_secs: u64) -> Option<f64> {
        let last = self.points.len().checked_sub(1)?;
        let target = timestamp_secs.saturating_mul(1000);

        let idx = self
            .points
            .partition_point(|p| p.timestamp_ms < target)
            .min(last);
        let candidate = &self.points[idx];
        let previous = &self.points[idx.saturating_sub(1)];

        if candidate.timestamp_ms.abs_diff(target) <= previous.timestamp_ms.abs_diff(target) {
            Some(candidate.price_usd)
        } else {
            Some(previous.price_usd)
        }
    }
}
