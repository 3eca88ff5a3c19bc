//! Placeholder forecast used when no forecast endpoint answered.
//!
//! The values are random noise around the current temperature so the
//! dashboard stays renderable; they are not a forecast.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::{
    model::{Condition, DailyForecast, Forecast, ForecastSource, TempRange},
    normalize::{MAX_DAYS, PLACEHOLDER_UVI},
};

/// Base temperature when the current conditions are unknown.
pub const DEFAULT_BASE_TEMP_C: f64 = 20.0;

const CONDITIONS: [&str; 3] = ["Clear", "Clouds", "Rain"];
const ICON: &str = "01d";

/// Seven days starting at `now`.
///
/// `max` spans `[base - 5, base + 5]`; the upper bound is reachable once the
/// largest draw below 1 rounds up. `min` subtracts a random amount *and* a
/// fixed 5 °C, so it spans `[base - 15, base - 5]`. The two bands only meet at
/// `base - 5`, so `min <= max` holds for every draw.
pub fn generate<R: Rng>(rng: &mut R, base_temp_c: Option<f64>, now: DateTime<Utc>) -> Forecast {
    let base = base_temp_c.unwrap_or(DEFAULT_BASE_TEMP_C);

    let daily = (0..MAX_DAYS as i64)
        .map(|i| {
            let max = base + rng.random::<f64>() * 10.0 - 5.0;
            let min = base - rng.random::<f64>() * 10.0 - 5.0;
            let pick = (rng.random::<f64>() * CONDITIONS.len() as f64) as usize;
            let main = CONDITIONS[pick.min(CONDITIONS.len() - 1)];
            let pop = rng.random::<f64>() * 0.8;
            let wind_speed = rng.random::<f64>() * 10.0;
            let wind_gust = rng.random::<f64>() * 15.0;
            let rain_mm = (rng.random::<f64>() > 0.7).then(|| rng.random::<f64>() * 5.0);

            DailyForecast {
                dt: (now + Duration::days(i)).timestamp(),
                temp: TempRange { max, min },
                condition: Condition {
                    main: main.to_string(),
                    description: main.to_lowercase(),
                    icon: ICON.to_string(),
                },
                pop,
                wind_speed_mps: wind_speed,
                wind_gust_mps: Some(wind_gust),
                rain_mm,
            }
        })
        .collect();

    Forecast {
        source: ForecastSource::Synthetic,
        current_uvi: Some(PLACEHOLDER_UVI),
        daily,
        alerts: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng, rngs::StdRng};

    /// Always yields the same word, so every uniform draw is the same value.
    struct ConstRng(u64);

    impl RngCore for ConstRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (i, b) in dst.iter_mut().enumerate() {
                *b = (self.0 >> ((i % 8) * 8)) as u8;
            }
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_710_028_800, 0).unwrap()
    }

    #[test]
    fn always_seven_days_one_day_apart() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let forecast = generate(&mut rng, Some(28.0), now());

            assert_eq!(forecast.source, ForecastSource::Synthetic);
            assert_eq!(forecast.daily.len(), 7);
            assert_eq!(forecast.daily[0].dt, now().timestamp());
            for pair in forecast.daily.windows(2) {
                assert_eq!(pair[1].dt - pair[0].dt, 86_400);
            }
        }
    }

    #[test]
    fn draws_stay_within_bands() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let forecast = generate(&mut rng, Some(10.0), now());
            for day in &forecast.daily {
                assert!((5.0..=15.0).contains(&day.temp.max), "max {}", day.temp.max);
                assert!((-5.0..=5.0).contains(&day.temp.min), "min {}", day.temp.min);
                assert!((0.0..0.8).contains(&day.pop));
                assert!((0.0..10.0).contains(&day.wind_speed_mps));
                assert!(day.wind_gust_mps.is_some_and(|g| (0.0..15.0).contains(&g)));
                assert!(day.rain_mm.is_none_or(|r| (0.0..5.0).contains(&r)));
                assert!(CONDITIONS.contains(&day.condition.main.as_str()));
                assert_eq!(day.condition.icon, "01d");
            }
        }
    }

    #[test]
    fn zero_draws_give_exact_lower_bounds() {
        let forecast = generate(&mut ConstRng(0), None, now());

        for day in &forecast.daily {
            assert_eq!(day.temp.max, 15.0);
            assert_eq!(day.temp.min, 15.0);
            assert_eq!(day.condition.main, "Clear");
            assert_eq!(day.pop, 0.0);
            assert_eq!(day.wind_speed_mps, 0.0);
            assert_eq!(day.wind_gust_mps, Some(0.0));
            assert_eq!(day.rain_mm, None);
        }
    }

    #[test]
    fn high_draws_pick_rain_and_reach_upper_bound() {
        let forecast = generate(&mut ConstRng(u64::MAX), Some(20.0), now());

        for day in &forecast.daily {
            assert_eq!(day.condition.main, "Rain");
            assert!(day.rain_mm.is_some());
            // 20 + (1 - 2^-53) * 10 - 5 rounds to exactly 25.0
            assert!(day.temp.max > 24.99 && day.temp.max <= 25.0);
            assert!(day.temp.min >= 5.0 && day.temp.min < 5.01);
            assert!(day.temp.min <= day.temp.max);
        }
    }

    #[test]
    fn missing_base_uses_twenty_degrees() {
        let forecast = generate(&mut ConstRng(0), None, now());
        assert_eq!(forecast.daily[0].temp.max, DEFAULT_BASE_TEMP_C - 5.0);
        assert_eq!(forecast.current_uvi, Some(PLACEHOLDER_UVI));
    }

    #[test]
    fn min_never_exceeds_max() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            for day in generate(&mut rng, Some(20.0), now()).daily {
                assert!(day.temp.min <= day.temp.max, "seed {seed}: {:?}", day.temp);
            }
        }
    }
}
