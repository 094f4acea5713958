use proptest::prelude::*;
use qf_diag::{
    pearson, spatial_correlation, windowed_correlation, windowed_mutual_correlation, Correlation,
};
use qf_lattice::SelfPotential;

proptest! {
    #[test]
    fn pearson_is_bounded(
        pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..64)
    ) {
        let (a, b): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = pearson(&a, &b).value();
        prop_assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn constant_field_never_correlates(value in -1e3f64..1e3, len in 3usize..200) {
        let field = vec![value; len];
        prop_assert_eq!(spatial_correlation(&field), Correlation::Degenerate);
        prop_assert_eq!(spatial_correlation(&field).value(), 0.0);
    }

    #[test]
    fn constant_field_has_zero_windowed_correlation(
        value in -10.0f64..10.0,
        len in 12usize..120,
        window in 2usize..12,
    ) {
        let field = vec![value; len];
        let momentum = vec![0.0; len];
        let potential = SelfPotential::quartic(1.0, 0.1);
        let result = windowed_mutual_correlation(&field, &momentum, 0.1, 0.0, &potential, window);
        prop_assert_eq!(result.offsets.len(), len - window);
        prop_assert!(result.offsets.iter().all(|&r| r == 0.0));
        prop_assert_eq!(result.mean, 0.0);

        let density = vec![value; len];
        let direct = windowed_correlation(&density, window);
        prop_assert!(direct.offsets.iter().all(|&r| r == 0.0));
        prop_assert_eq!(direct.mean, 0.0);
    }

    #[test]
    fn windowed_offsets_count(len in 3usize..150, window in 2usize..40) {
        let density: Vec<f64> = (0..len).map(|i| ((i * 7) % 11) as f64).collect();
        let result = windowed_correlation(&density, window);
        prop_assert_eq!(result.offsets.len(), len.saturating_sub(window));
        prop_assert!(result.offsets.iter().all(|r| (-1.0..=1.0).contains(r)));
    }
}
