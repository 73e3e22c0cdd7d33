#![cfg(feature = "rayon")]

use rastermatch::{MatchConfig, Matcher, Raster, ScoreFormula, SpreadMode};

fn make_source(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn configs() -> Vec<MatchConfig> {
    let mut out = Vec::new();
    for formula in [ScoreFormula::Reference, ScoreFormula::Ncc] {
        for spread in [SpreadMode::Reference, SpreadMode::Corrected] {
            for min_score in [0.0, f64::NEG_INFINITY] {
                out.push(MatchConfig {
                    formula,
                    spread,
                    min_score,
                    ..MatchConfig::default()
                });
            }
        }
    }
    out
}

#[test]
fn parallel_matches_sequential() {
    let width = 96;
    let height = 72;
    let source = Raster::new(make_source(width, height), width, height).unwrap();
    let pattern = source.view().roi(40, 23, 14, 11).unwrap().to_raster();

    for cfg in configs() {
        let seq = Matcher::new(pattern.view()).unwrap().with_config(MatchConfig {
            parallel: false,
            ..cfg.clone()
        });
        let par = Matcher::new(pattern.view()).unwrap().with_config(MatchConfig {
            parallel: true,
            ..cfg
        });

        let seq_result = seq.match_source(source.view()).unwrap();
        let par_result = par.match_source(source.view()).unwrap();
        assert_eq!(seq_result, par_result);

        let seq_map = seq.score_map(source.view()).unwrap();
        let par_map = par.score_map(source.view()).unwrap();
        assert_eq!(seq_map, par_map);
        if seq.config().min_score == f64::NEG_INFINITY {
            assert_eq!(par_map.best(), par_result.candidate());
        }

        let seq_top = seq.match_topk(source.view(), 4, 2).unwrap();
        let par_top = par.match_topk(source.view(), 4, 2).unwrap();
        assert_eq!(seq_top, par_top);
    }
}

#[test]
fn parallel_ties_resolve_to_first_offset() {
    let width = 40;
    let height = 30;
    let mut data = make_source(width, height);
    let patch: Vec<u8> = (0..20u8).map(|v| v.wrapping_mul(37)).collect();
    for &(x0, y0) in &[(25usize, 3usize), (4, 18), (30, 18)] {
        for y in 0..4 {
            for x in 0..5 {
                data[(y0 + y) * width + x0 + x] = patch[y * 5 + x];
            }
        }
    }
    let source = Raster::new(data, width, height).unwrap();
    let pattern = Raster::new(patch, 5, 4).unwrap();

    let cfg = MatchConfig {
        formula: ScoreFormula::Ncc,
        spread: SpreadMode::Corrected,
        parallel: true,
        ..MatchConfig::default()
    };
    let result = Matcher::new(pattern.view())
        .unwrap()
        .with_config(cfg)
        .match_source(source.view())
        .unwrap();
    assert_eq!(result.offset(), Some((25, 3)));
}
