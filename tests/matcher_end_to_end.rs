use rastermatch::{
    match_pattern, match_pattern_with, EdgePolicy, MatchConfig, MatchError, Matcher, Raster,
    RasterView, ScoreFormula, SpreadMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_raster(rng: &mut StdRng, width: usize, height: usize) -> Raster<u8> {
    let data = (0..width * height)
        .map(|_| rng.random_range(0..=255u8))
        .collect();
    Raster::new(data, width, height).unwrap()
}

fn crop(raster: &Raster<u8>, x: usize, y: usize, width: usize, height: usize) -> Raster<u8> {
    raster.view().roi(x, y, width, height).unwrap().to_raster()
}

fn ncc_config() -> MatchConfig {
    MatchConfig {
        formula: ScoreFormula::Ncc,
        spread: SpreadMode::Corrected,
        ..MatchConfig::default()
    }
}

fn reference_spread(mean: f64, samples: &[f64]) -> f64 {
    if samples.len() <= 1 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for &s in samples {
        let d = mean - s;
        if d > 0.0 {
            sum += d.sqrt();
        }
    }
    (sum / (samples.len() - 1) as f64).sqrt()
}

/// Literal reference search, written out independently of the library.
fn brute_force_reference(
    source: &Raster<u8>,
    pattern: &Raster<u8>,
    min_score: f64,
) -> Option<(usize, usize, f64)> {
    let p: Vec<f64> = pattern.data().iter().map(|&v| v as f64).collect();
    let pm = p.iter().sum::<f64>() / p.len() as f64;
    let ps = reference_spread(pm, &p);

    let mut best = None;
    let mut best_score = min_score;
    for y in 0..source.height() - pattern.height() {
        for x in 0..source.width() - pattern.width() {
            let w: Vec<f64> = crop(source, x, y, pattern.width(), pattern.height())
                .data()
                .iter()
                .map(|&v| v as f64)
                .collect();
            let wm = w.iter().sum::<f64>() / w.len() as f64;
            let ws = reference_spread(wm, &w);
            if ws <= 0.0 || ps <= 0.0 {
                continue;
            }
            let mut score = 0.0f64;
            for (a, b) in w.iter().zip(p.iter()) {
                score += ((a - wm) * b - pm) * (1.0 / (ws * ps));
            }
            if score.is_finite() && score > best_score {
                best_score = score;
                best = Some((x, y, score));
            }
        }
    }
    best
}

#[test]
fn cropped_pattern_is_found_at_its_offset() {
    let mut rng = StdRng::seed_from_u64(7);
    let source = random_raster(&mut rng, 40, 30);
    let pattern = crop(&source, 13, 9, 8, 6);

    let result = match_pattern_with(source.view(), pattern.view(), ncc_config()).unwrap();
    assert!(result.found);
    assert_eq!((result.x, result.y), (13, 9));
    assert!((result.score - 47.0 / 48.0).abs() < 1e-9);
    assert_eq!(result.window.as_ref(), Some(&pattern));
    assert_eq!(result.evaluated, (40 - 8) * (30 - 6));
}

#[test]
fn reference_formula_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(99);
    let source = random_raster(&mut rng, 24, 18);
    let pattern = crop(&source, 5, 4, 5, 4);
    let cfg = MatchConfig {
        min_score: f64::NEG_INFINITY,
        ..MatchConfig::default()
    };

    let result = match_pattern_with(source.view(), pattern.view(), cfg).unwrap();
    let (x, y, score) = brute_force_reference(&source, &pattern, f64::NEG_INFINITY).unwrap();
    assert!(result.found);
    assert_eq!((result.x, result.y), (x, y));
    assert!((result.score - score).abs() < 1e-9);
}

#[test]
fn reference_formula_matches_brute_force_at_default_threshold() {
    let mut rng = StdRng::seed_from_u64(2024);
    let source = random_raster(&mut rng, 20, 20);
    let pattern = random_raster(&mut rng, 4, 4);

    let result = match_pattern(source.view(), pattern.view()).unwrap();
    let expected = brute_force_reference(&source, &pattern, 0.0);
    assert_eq!(result.found, expected.is_some());
    if let Some((x, y, score)) = expected {
        assert_eq!((result.x, result.y), (x, y));
        assert!((result.score - score).abs() < 1e-9);
    }
}

#[test]
fn oversized_pattern_fails_before_scanning() {
    let source = Raster::new(vec![0u8; 16], 4, 4).unwrap();
    let wide = Raster::new(vec![1u8; 10], 5, 2).unwrap();
    let tall = Raster::new(vec![1u8; 10], 2, 5).unwrap();

    let err = match_pattern(source.view(), wide.view()).unwrap_err();
    assert_eq!(
        err,
        MatchError::InvalidDimensions {
            pattern_width: 5,
            pattern_height: 2,
            source_width: 4,
            source_height: 4,
        }
    );
    let err = match_pattern(source.view(), tall.view()).unwrap_err();
    assert!(matches!(err, MatchError::InvalidDimensions { .. }));
}

#[test]
fn empty_rasters_are_rejected() {
    let source = Raster::new(vec![1u8, 2, 3, 4], 2, 2).unwrap();
    let no_width = Raster::<u8>::new(Vec::new(), 0, 3).unwrap();
    let no_height = Raster::<u8>::new(Vec::new(), 3, 0).unwrap();

    let err = match_pattern(source.view(), no_width.view()).unwrap_err();
    assert_eq!(err, MatchError::EmptyRaster { width: 0, height: 3 });
    let err = match_pattern(no_height.view(), source.view()).unwrap_err();
    assert_eq!(err, MatchError::EmptyRaster { width: 3, height: 0 });

    let matcher = Matcher::new(source.view()).unwrap();
    let err = matcher.match_source(no_width.view()).unwrap_err();
    assert_eq!(err, MatchError::EmptyRaster { width: 0, height: 3 });
    assert!(matcher.score_map(no_height.view()).is_err());
}

#[test]
fn uniform_windows_are_skipped_not_selected() {
    let mut rng = StdRng::seed_from_u64(5);
    let width = 30;
    let height = 20;
    let mut data: Vec<u8> = (0..width * height)
        .map(|_| rng.random_range(0..=255u8))
        .collect();
    // flat block in the top-left corner
    for y in 0..8 {
        for x in 0..10 {
            data[y * width + x] = 128;
        }
    }
    let source = Raster::new(data, width, height).unwrap();
    let pattern = crop(&source, 18, 11, 4, 4);

    let matcher = Matcher::new(pattern.view()).unwrap().with_config(ncc_config());
    let result = matcher.match_source(source.view()).unwrap();
    assert!(result.found);
    assert_eq!((result.x, result.y), (18, 11));
    // windows fully inside the flat block: x in 0..=6, y in 0..=4
    assert!(result.skipped >= 7 * 5);

    let map = matcher.score_map(source.view()).unwrap();
    assert_eq!(map.get(0, 0), Some(f64::NEG_INFINITY));
    assert_eq!(map.get(6, 4), Some(f64::NEG_INFINITY));
    assert!(map.scores().iter().all(|s| !s.is_nan()));
    let skipped = map.scores().iter().filter(|s| s.is_infinite()).count();
    assert_eq!(skipped, result.skipped);
    assert_eq!(map.best(), result.candidate());
}

#[test]
fn overflowing_scores_are_skipped_not_selected() {
    let source = Raster::from_rows(&[
        [2.0f64, 1e300, 5.0, 3.0],
        [7.0, 4.0, 9.0, 1.0],
        [6.0, 8.0, 2.0, 5.0],
        [3.0, 9.0, 4.0, 7.0],
    ])
    .unwrap();
    let pattern = Raster::new(vec![1e10f64, 3e10, 2e10, 0.0], 2, 2).unwrap();
    let cfg = MatchConfig {
        min_score: f64::NEG_INFINITY,
        ..MatchConfig::default()
    };
    let matcher = Matcher::new(pattern.view()).unwrap().with_config(cfg);

    // both windows holding 1e300 keep a finite spread but overflow the sum
    let map = matcher.score_map(source.view()).unwrap();
    assert_eq!(map.get(0, 0), Some(f64::NEG_INFINITY));
    assert_eq!(map.get(1, 0), Some(f64::NEG_INFINITY));
    assert!(matcher.score_at(source.view(), 1, 0).is_none());

    let result = matcher.match_source(source.view()).unwrap();
    assert_eq!(result.evaluated, 4);
    assert_eq!(result.skipped, 2);
    assert_eq!(result.offset(), Some((1, 1)));
    assert!(result.score.is_finite());
    assert!((result.score / 245_742_951.749_100_7 - 1.0).abs() < 1e-9);
    assert_eq!(map.best(), result.candidate());
}

#[test]
fn last_legal_row_and_column_are_not_evaluated() {
    let mut rng = StdRng::seed_from_u64(11);
    let (width, height) = (16, 12);
    let (pw, ph) = (5, 4);
    let source = random_raster(&mut rng, width, height);
    let corner = crop(&source, width - pw, height - ph, pw, ph);

    let matcher = Matcher::new(corner.view()).unwrap().with_config(ncc_config());
    let map = matcher.score_map(source.view()).unwrap();
    assert_eq!((map.width(), map.height()), (width - pw, height - ph));
    assert_eq!(map.get(width - pw, 0), None);
    assert_eq!(map.get(0, height - ph), None);

    let result = matcher.match_source(source.view()).unwrap();
    assert_eq!(result.evaluated, (width - pw) * (height - ph));
    if let Some((x, y)) = result.offset() {
        assert!(x < width - pw && y < height - ph);
    }

    let inclusive = matcher.with_config(MatchConfig {
        edge: EdgePolicy::Inclusive,
        ..ncc_config()
    });
    let result = inclusive.match_source(source.view()).unwrap();
    assert_eq!(result.offset(), Some((width - pw, height - ph)));
    assert_eq!(result.evaluated, (width - pw + 1) * (height - ph + 1));
}

#[test]
fn pattern_as_large_as_source_evaluates_nothing() {
    let data = [1u8, 5, 2, 8];
    let source = Raster::new(data.to_vec(), 2, 2).unwrap();
    let result = match_pattern(source.view(), source.view()).unwrap();
    assert!(!result.found);
    assert_eq!(result.evaluated, 0);
}

#[test]
fn staircase_scenario_with_single_sample_pattern() {
    let source = Raster::from_rows(&[
        [1u8, 1, 1, 1, 1, 1],
        [2, 1, 1, 1, 1, 1],
        [3, 1, 1, 1, 1, 1],
        [4, 1, 1, 1, 1, 1],
    ])
    .unwrap();
    let pattern = Raster::new(vec![1u8], 1, 1).unwrap();

    let result = match_pattern(source.view(), pattern.view()).unwrap();
    // a single sample has zero spread, so every window is skipped
    assert_eq!(result.evaluated, 5 * 3);
    assert_eq!(result.skipped, 5 * 3);
    assert!(!result.found);
    assert!(result.window.is_none());

    // Letting zero spreads through leaves a zero divisor, so every score is
    // non-finite and still nothing is selected.
    let cfg = MatchConfig {
        edge: EdgePolicy::Inclusive,
        min_spread: -1.0,
        min_score: f64::NEG_INFINITY,
        ..MatchConfig::default()
    };
    for formula in [ScoreFormula::Reference, ScoreFormula::Ncc] {
        let cfg = MatchConfig { formula, ..cfg.clone() };
        let result = match_pattern_with(source.view(), pattern.view(), cfg).unwrap();
        assert_eq!(result.evaluated, 6 * 4);
        assert_eq!(result.skipped, 6 * 4);
        assert_eq!(result.offset(), None);
    }
}

#[test]
fn staircase_scenario_with_two_by_two_pattern() {
    let source = Raster::from_rows(&[
        [1u8, 1, 1, 1, 1, 1],
        [2, 1, 1, 1, 1, 1],
        [3, 1, 1, 1, 1, 1],
        [4, 1, 1, 1, 1, 1],
    ])
    .unwrap();
    let pattern = crop(&source, 0, 1, 2, 2);

    // Every reference score is negative here, so the default threshold of 0
    // finds nothing.
    let result = match_pattern(source.view(), pattern.view()).unwrap();
    assert!(!result.found);
    assert_eq!(result.evaluated, 8);
    assert_eq!(result.skipped, 6);

    let cfg = MatchConfig {
        min_score: f64::NEG_INFINITY,
        ..MatchConfig::default()
    };
    let result = match_pattern_with(source.view(), pattern.view(), cfg).unwrap();
    assert_eq!(result.offset(), Some((0, 1)));
    assert!((result.score + 7.361215932167729).abs() < 1e-9);
    let window = result.window.unwrap();
    assert_eq!((window.width(), window.height()), (2, 2));
    assert_eq!(window, pattern);

    let result = match_pattern_with(source.view(), pattern.view(), ncc_config()).unwrap();
    assert_eq!(result.offset(), Some((0, 1)));
    assert!((result.score - 0.75).abs() < 1e-12);
}

#[test]
fn negative_scores_need_a_lower_threshold() {
    let mut rng = StdRng::seed_from_u64(3);
    let source = random_raster(&mut rng, 12, 10);
    let pattern = Raster::from_rows(&[[199u8, 201, 201], [201, 199, 199], [199, 201, 199]]).unwrap();

    let result = match_pattern(source.view(), pattern.view()).unwrap();
    assert!(!result.found);
    assert_eq!(result.score, 0.0);
    assert!(result.window.is_none());

    let cfg = MatchConfig {
        min_score: f64::NEG_INFINITY,
        ..MatchConfig::default()
    };
    let result = match_pattern_with(source.view(), pattern.view(), cfg).unwrap();
    assert!(result.found);
    assert!(result.score < 0.0);
}

#[test]
fn window_copy_can_be_disabled() {
    let mut rng = StdRng::seed_from_u64(17);
    let source = random_raster(&mut rng, 20, 20);
    let pattern = crop(&source, 3, 7, 6, 5);
    let cfg = MatchConfig {
        copy_window: false,
        ..ncc_config()
    };
    let result = match_pattern_with(source.view(), pattern.view(), cfg).unwrap();
    assert_eq!(result.offset(), Some((3, 7)));
    assert!(result.window.is_none());
}

#[test]
fn topk_returns_both_copies_in_scan_order() {
    let mut rng = StdRng::seed_from_u64(21);
    let width = 48;
    let height = 32;
    let mut source = random_raster(&mut rng, width, height).into_data();
    let pattern = random_raster(&mut rng, 6, 5);
    for &(x0, y0) in &[(30usize, 4usize), (7, 20)] {
        for y in 0..5 {
            for x in 0..6 {
                source[(y0 + y) * width + x0 + x] = pattern.data()[y * 6 + x];
            }
        }
    }
    let source = Raster::new(source, width, height).unwrap();

    let matcher = Matcher::new(pattern.view()).unwrap().with_config(ncc_config());
    let top = matcher.match_topk(source.view(), 2, 3).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!((top[0].x, top[0].y), (30, 4));
    assert_eq!((top[1].x, top[1].y), (7, 20));
    assert_eq!(top[0].score, top[1].score);

    let best = matcher.match_source(source.view()).unwrap();
    assert_eq!(best.offset(), Some((30, 4)));
    assert_eq!(best.candidate(), Some(top[0]));

    let top = matcher.match_topk(source.view(), 5, 0).unwrap();
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert!(matcher.match_topk(source.view(), 0, 0).unwrap().is_empty());
}

#[test]
fn topk_without_a_bound_returns_every_candidate() {
    let mut rng = StdRng::seed_from_u64(31);
    let source = random_raster(&mut rng, 8, 8);
    let pattern = crop(&source, 2, 3, 3, 3);
    let matcher = Matcher::new(pattern.view()).unwrap().with_config(ncc_config());

    let top = matcher.match_topk(source.view(), usize::MAX, 0).unwrap();

    let map = matcher.score_map(source.view()).unwrap();
    let above = map.scores().iter().filter(|s| **s > 0.0).count();
    assert!(above > 0);
    assert_eq!(top.len(), above);
    assert_eq!((top[0].x, top[0].y), (2, 3));
    for pair in top.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.score > b.score || (a.score == b.score && (a.y, a.x) < (b.y, b.x)));
    }
    for candidate in &top {
        assert_eq!(map.get(candidate.x, candidate.y), Some(candidate.score));
    }
}

#[test]
fn score_at_accepts_any_fitting_offset() {
    let mut rng = StdRng::seed_from_u64(8);
    let source = random_raster(&mut rng, 10, 10);
    let pattern = crop(&source, 6, 6, 4, 4);
    let matcher = Matcher::new(pattern.view()).unwrap().with_config(ncc_config());

    let score = matcher.score_at(source.view(), 6, 6).unwrap();
    assert!((score - 15.0 / 16.0).abs() < 1e-9);
    assert!(matcher.score_at(source.view(), 7, 6).is_none());
}

#[test]
fn floating_point_and_wide_samples_match() {
    let width = 18;
    let height = 14;
    let source_f32: Vec<f32> = (0..width * height)
        .map(|i| ((i as f32) * 0.37).sin() * 100.0 + (i % 7) as f32)
        .collect();
    let source = RasterView::from_slice(&source_f32, width, height).unwrap();
    let pattern = source.roi(9, 5, 4, 3).unwrap();
    let result = match_pattern_with(source, pattern, ncc_config()).unwrap();
    assert_eq!(result.offset(), Some((9, 5)));

    let source_u16: Vec<u16> = (0..width * height)
        .map(|i| ((i * i * 131 + i * 7) % 4093) as u16)
        .collect();
    let source = RasterView::from_slice(&source_u16, width, height).unwrap();
    let pattern = source.roi(2, 8, 5, 3).unwrap().to_raster();
    let result = match_pattern_with(source, pattern.view(), ncc_config()).unwrap();
    assert_eq!(result.offset(), Some((2, 8)));
    assert_eq!(result.window, Some(pattern));
}

#[test]
fn strided_source_views_are_supported() {
    let mut rng = StdRng::seed_from_u64(13);
    let padded = random_raster(&mut rng, 24, 16);
    // 20 usable columns out of a 24-wide buffer
    let source = RasterView::new(padded.data(), 20, 16, 24).unwrap();
    let pattern = source.roi(11, 6, 5, 5).unwrap();
    let result = match_pattern_with(source, pattern, ncc_config()).unwrap();
    assert_eq!(result.offset(), Some((11, 6)));
    assert_eq!(result.evaluated, (20 - 5) * (16 - 5));
}
