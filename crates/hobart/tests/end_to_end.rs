//! End-to-end ranking from signal snapshots.

use approx::assert_relative_eq;
use hobart::data::SignalSnapshot;
use hobart::factors::FactorId;
use hobart::{EngineConfig, EngineError, FactorWeights, RankingEngine};
use rstest::rstest;

const SNAPSHOT: &str = "\
symbol,sector,momentum_12_1,book_to_market,market_cap,beta,comment
A,Tech,1.0,0.5,1000,1.2,first
B,Tech,3.0,0.7,2000,0.9,
C,Tech,10.0,,4000,NA,outlier
D,Energy,,1.5,500,1.1,
";

fn engine() -> RankingEngine<SignalSnapshot> {
    let snapshot = SignalSnapshot::from_csv_reader(SNAPSHOT.as_bytes()).unwrap();
    let universe = snapshot.universe();
    let sectors = snapshot.sectors();
    RankingEngine::new(snapshot, universe, sectors)
}

fn only(id: FactorId) -> FactorWeights {
    let mut weights = FactorWeights {
        value: 0.0,
        size: 0.0,
        momentum: 0.0,
        lowvol: 0.0,
        quality: 0.0,
        market_risk: 0.0,
    };
    weights.set(id, 1.0);
    weights
}

#[test]
fn test_momentum_only_ranking() {
    let engine = engine();
    let ranking = engine.session().rank_all(&only(FactorId::Momentum)).unwrap();

    // D has no momentum; its other factor scores carry zero weight
    assert_eq!(ranking.symbols(), ["C", "D", "B", "A"]);
    let (_, top) = ranking.iter().next().unwrap();
    assert_relative_eq!(top, 1.3822, epsilon = 1e-4);
}

#[test]
fn test_single_member_sector_uses_global_fallback() {
    let engine = engine();
    let mut session = engine.session();
    let snapshot = session.snapshot();

    // value: Tech has A and B, Energy only D which falls back to the universe
    let d = snapshot.score(FactorId::Value, "D").unwrap();
    let a = snapshot.score(FactorId::Value, "A").unwrap();
    assert!(d > 0.0);
    assert_relative_eq!(a, -1.0, epsilon = 1e-12);
    assert_eq!(snapshot.score(FactorId::Value, "C"), None);
}

#[test]
fn test_default_weights_rank_everyone_with_any_score() {
    let engine = engine();
    let ranking = engine.session().rank_all(&FactorWeights::default()).unwrap();
    assert_eq!(ranking.len(), 4);
}

#[test]
fn test_ranking_is_deterministic() {
    let engine = engine();
    let weights = FactorWeights::default();
    let first = engine.session().rank_all(&weights).unwrap();
    let second = engine.session().rank_all(&weights).unwrap();
    assert_eq!(first, second);
}

#[rstest]
#[case(0, 0)]
#[case(2, 2)]
#[case(50, 4)]
fn test_top_n_lengths(#[case] n: usize, #[case] expected: usize) {
    let engine = engine();
    let ranking = engine.session().top_n(n, &FactorWeights::default()).unwrap();
    assert_eq!(ranking.len(), expected);
}

#[test]
fn test_top_n_is_prefix_of_full_ranking() {
    let engine = engine();
    let mut session = engine.session();
    let weights = FactorWeights::default();
    let full = session.rank_all(&weights).unwrap();
    let top = session.top_n(2, &weights).unwrap();
    assert_eq!(top.symbols(), full.symbols()[..2]);
}

#[test]
fn test_negative_weight_is_rejected() {
    let engine = engine();
    let weights = FactorWeights {
        value: -0.5,
        ..FactorWeights::default()
    };
    assert!(matches!(
        engine.session().rank_all(&weights),
        Err(EngineError::Factor(_))
    ));
}

#[test]
fn test_sectors_from_provider() {
    let snapshot = SignalSnapshot::from_csv_reader(SNAPSHOT.as_bytes()).unwrap();
    let universe = snapshot.universe();
    let sectors = snapshot.sectors();
    let engine = RankingEngine::from_provider(snapshot, universe);
    assert_eq!(engine.sectors(), &sectors);
    assert_eq!(engine.sectors().sector("D"), Some("Energy"));
}

#[test]
fn test_configured_engine() {
    let config = EngineConfig::from_json_str(r#"{"min_market_cap": 1500}"#).unwrap();
    let snapshot = SignalSnapshot::from_csv_reader(SNAPSHOT.as_bytes()).unwrap();
    let universe = snapshot.universe();
    let sectors = snapshot.sectors();
    let engine = RankingEngine::with_config(snapshot, universe, sectors, &config).unwrap();

    let snapshot = engine.load_factor_scores();
    // only B and C clear the floor
    assert_eq!(snapshot.coverage(FactorId::Size), 2);
    assert_eq!(snapshot.score(FactorId::Size, "A"), None);
}
