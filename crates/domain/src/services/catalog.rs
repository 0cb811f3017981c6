//! Catalog helpers shared by the vehicle routes and repository.

/// Price band used for "similar vehicles": ±25% of the reference price.
pub const SIMILAR_PRICE_TOLERANCE_PCT: i64 = 25;

/// Inclusive price range around `price` for similar-vehicle lookups.
pub fn similar_price_range(price: i64) -> (i64, i64) {
    let price = price.max(0);
    let delta = price / 100 * SIMILAR_PRICE_TOLERANCE_PCT
        + price % 100 * SIMILAR_PRICE_TOLERANCE_PCT / 100;
    (price - delta, price.saturating_add(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_price_range() {
        assert_eq!(similar_price_range(20_000), (15_000, 25_000));
        assert_eq!(similar_price_range(0), (0, 0));
        assert_eq!(similar_price_range(199), (150, 248));
    }

    #[test]
    fn test_similar_price_range_huge_price() {
        let (low, high) = similar_price_range(1_000_000_000_000_000_000);
        assert_eq!(low, 750_000_000_000_000_000);
        assert_eq!(high, 1_250_000_000_000_000_000);
        assert_eq!(similar_price_range(i64::MAX).1, i64::MAX);
    }
}
