//! Unit tests for resto-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, PoolId, ProcessId};

    #[test]
    fn index_roundtrip() {
        let id = EntityId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EntityId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn next_increments() {
        assert_eq!(ProcessId(7).next(), ProcessId(8));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(ProcessId::INVALID.0, u64::MAX);
        assert_eq!(PoolId::INVALID.0, u16::MAX);
        assert_eq!(PoolId::default(), PoolId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(PoolId(3).to_string(), "PoolId(3)");
    }
}

#[cfg(test)]
mod time {
    use crate::{CoreError, SimTime};

    #[test]
    fn arithmetic() {
        let t = SimTime(10.0);
        assert_eq!(t + 5.0, SimTime(15.0));
        assert_eq!(t.offset(2.5), SimTime(12.5));
        assert_eq!(SimTime(15.0) - SimTime(10.0), 5.0);
        assert_eq!(SimTime(15.0).since(SimTime(4.0)), 11.0);
    }

    #[test]
    fn total_ordering() {
        let mut times = vec![SimTime(3.0), SimTime::NEVER, SimTime::ZERO, SimTime(1.5)];
        times.sort();
        assert_eq!(times, vec![SimTime::ZERO, SimTime(1.5), SimTime(3.0), SimTime::NEVER]);
    }

    #[test]
    fn new_rejects_nan_and_negative() {
        assert!(matches!(SimTime::new(f64::NAN), Err(CoreError::InvalidTime(_))));
        assert_eq!(SimTime::new(-1.0), Err(CoreError::InvalidTime(-1.0)));
        assert_eq!(SimTime::new(2.0), Ok(SimTime(2.0)));
    }

    #[test]
    fn negative_zero_normalised() {
        assert_eq!(SimTime::new(-0.0).unwrap(), SimTime::ZERO);
    }

    #[test]
    fn hash_agrees_with_eq() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        assert!(seen.insert(SimTime::ZERO));
        assert!(!seen.insert(SimTime::new(0.0).unwrap()));
        assert!(!seen.insert(SimTime::new(-0.0).unwrap()));
        assert!(seen.insert(SimTime(2.5)));
        assert!(seen.insert(SimTime::NEVER));
        assert_eq!(seen.len(), 3);
    }
}

#[cfg(test)]
mod rng {
    use crate::{CoreError, FixedSampler, Sampler, SimRng, SizeRange};

    #[test]
    fn same_seed_same_draws() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.exponential(3.0).to_bits(), b.exponential(3.0).to_bits());
            assert_eq!(a.size(1, 6), b.size(1, 6));
        }
    }

    #[test]
    fn exponential_positive_with_plausible_mean() {
        let mut rng = SimRng::new(1);
        let n = 20_000;
        let total: f64 = (0..n).map(|_| rng.exponential(4.0)).sum();
        let mean = total / n as f64;
        assert!((mean - 4.0).abs() < 0.2, "sample mean {mean}");
    }

    #[test]
    fn infinite_mean_never_fires() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.exponential(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn size_within_bounds() {
        let mut rng = SimRng::new(99);
        for _ in 0..1_000 {
            let s = rng.size(1, 3);
            assert!((1..=3).contains(&s));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::new(5);
        let mut b = SimRng::new(6);
        let draws_a: Vec<u64> = (0..8).map(|_| a.exponential(1.0).to_bits()).collect();
        let draws_b: Vec<u64> = (0..8).map(|_| b.exponential(1.0).to_bits()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn fixed_sampler_returns_mean_and_clamped_size() {
        let mut s = FixedSampler::new(9);
        assert_eq!(s.exponential(3.5), 3.5);
        assert_eq!(s.size(1, 6), 6);
        assert_eq!(FixedSampler::new(0).size(1, 6), 1);
    }

    #[test]
    fn size_range_validation() {
        assert!(SizeRange::new(1, 6).is_ok());
        assert!(SizeRange::new(2, 2).is_ok());
        assert_eq!(SizeRange::new(0, 3), Err(CoreError::InvalidRange { lo: 0, hi: 3 }));
        assert!(SizeRange::new(4, 3).is_err());
    }

    #[test]
    fn size_range_samples_through_sampler() {
        let range = SizeRange::new(2, 4).unwrap();
        assert_eq!(range.sample(&mut FixedSampler::new(10)), 4);
        let mut rng = SimRng::new(3);
        assert!((2..=4).contains(&range.sample(&mut rng)));
    }
}
