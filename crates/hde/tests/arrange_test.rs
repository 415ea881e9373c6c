use hde::arena::VertexArena;
use hde::layout::bfs;
use hde::layout::pivots::PivotSelector;
use hde::{
    ArrangeOptions, Cancellation, Dimensions, Error, Layout, NeverCancel, UnreachedPolicy,
    arrange, arrange_with, compute_layout,
};
use hde_graph::{GraphRead, MemoryGraph, Position};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::rngs::mock::StepRng;
use std::cell::Cell;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::AtomicBool;

fn path_graph(n: usize) -> MemoryGraph {
    let mut g = MemoryGraph::with_vertices(n);
    let ids: Vec<u32> = (0..n as u32).collect();
    g.set_path(&ids).unwrap();
    g
}

fn directed_cycle(n: usize) -> MemoryGraph {
    let mut g = path_graph(n);
    g.add_edge(n as u32 - 1, 0).unwrap();
    g
}

fn stub_rng() -> StepRng {
    StepRng::new(0x0123_4567_89AB_CDEF, 0x9E37_79B9_7F4A_7C15)
}

fn opts(dimensions: Dimensions) -> ArrangeOptions {
    ArrangeOptions::new(dimensions).with_seed(42)
}

fn layout_of(g: &MemoryGraph, options: &ArrangeOptions) -> Layout {
    compute_layout(g, options, &mut stub_rng(), &NeverCancel).unwrap()
}

#[test]
fn nearest_pivot_table_after_first_pivot_is_bfs_from_vertex_zero() {
    let g = path_graph(9);
    let arena = VertexArena::from_graph(&g).unwrap();

    let mut selector = PivotSelector::new(arena.adjacency());
    let step = selector.advance().unwrap();
    assert_eq!(step.pivot, 0);

    let mut expected = vec![0; 9];
    let mut q = VecDeque::new();
    bfs::hop_distances(arena.adjacency(), 0, &mut expected, &mut q, None);
    assert_eq!(selector.nearest(), expected.as_slice());
    assert_eq!(expected, (0..9).collect::<Vec<i32>>());
}

#[test]
fn first_pivot_is_first_enumerated_vertex() {
    let mut g = path_graph(6);
    // Removing vertex 0 moves vertex 5 to the front of the enumeration.
    g.remove_vertex(0).unwrap();
    let first = g.vertex_at(0);
    assert_eq!(first, 5);

    let layout = layout_of(&g, &opts(Dimensions::Two));
    assert_eq!(layout.pivots[0], first);
}

#[test]
fn every_vertex_becomes_a_pivot_once_when_pivots_outnumber_vertices() {
    let g = path_graph(7);
    let layout = layout_of(&g, &opts(Dimensions::Two));

    assert_eq!(layout.pivots.len(), 7);
    let unique: BTreeSet<_> = layout.pivots.iter().copied().collect();
    assert_eq!(unique, (0..7).collect());
}

#[test]
fn farthest_point_selection_on_a_path() {
    let g = path_graph(9);
    let options = ArrangeOptions {
        pivot_count: 3,
        ..opts(Dimensions::Two)
    };
    let layout = layout_of(&g, &options);
    // 0, then the far end, then the first vertex at the maximal distance of 4 from both.
    assert_eq!(layout.pivots, vec![0, 8, 4]);
}

#[test]
fn a_fixed_seed_reproduces_the_layout_exactly() {
    let g = path_graph(20);
    let options = opts(Dimensions::Three);
    let seeded = |seed| {
        compute_layout(&g, &options, &mut StdRng::seed_from_u64(seed), &NeverCancel).unwrap()
    };
    assert_eq!(seeded(9), seeded(9));
    assert_eq!(layout_of(&g, &options), layout_of(&g, &options));

    let mut g1 = path_graph(20);
    let mut g2 = path_graph(20);
    arrange(&mut g1, &opts(Dimensions::Three)).unwrap();
    arrange(&mut g2, &opts(Dimensions::Three)).unwrap();
    for v in g1.vertices() {
        assert_eq!(g1.position(v), g2.position(v));
    }
}

#[test]
fn different_seeds_agree_up_to_rotation_and_reflection() {
    let g = path_graph(12);
    let tight = ArrangeOptions {
        epsilon: 1e-12,
        max_iterations: 10_000,
        ..ArrangeOptions::new(Dimensions::Two)
    };
    let a = compute_layout(&g, &tight, &mut StdRng::seed_from_u64(1), &NeverCancel).unwrap();
    let b = compute_layout(&g, &tight, &mut StdRng::seed_from_u64(2), &NeverCancel).unwrap();

    let dist = |l: &Layout, u: u32, v: u32| {
        let (p, q) = (l.positions[&u], l.positions[&v]);
        ((p.x - q.x).powi(2) + (p.y - q.y).powi(2)).sqrt()
    };
    for u in 0..12 {
        for v in (u + 1)..12 {
            let (da, db) = (dist(&a, u, v), dist(&b, u, v));
            assert!(
                (da - db).abs() <= 1e-3 * da.max(1.0),
                "distance {u}-{v}: {da} vs {db}"
            );
        }
    }
}

#[test]
fn two_dimensional_layouts_never_write_z() {
    let mut g = path_graph(5);
    for v in 0..5 {
        g.set_position(v, Position::new(0.0, 0.0, 7.5)).unwrap();
    }
    arrange(&mut g, &opts(Dimensions::Two)).unwrap();
    for v in g.vertices() {
        assert_eq!(g.position(v).z, 7.5);
    }
}

#[test]
fn directed_five_cycle_in_three_dimensions() {
    let mut g = directed_cycle(5);
    let options = opts(Dimensions::Three);

    let layout =
        compute_layout(&g, &options, &mut StdRng::seed_from_u64(5), &NeverCancel).unwrap();
    assert_eq!(layout.pivots[0], 0);
    assert!(layout.degenerate_axes.is_empty());

    arrange(&mut g, &options).unwrap();
    let triples: Vec<Position> = g.vertices().map(|v| g.position(v)).collect();
    assert_eq!(triples.len(), 5);
    for (i, p) in triples.iter().enumerate() {
        assert!(
            p.x != 0.0 || p.y != 0.0 || p.z != 0.0,
            "vertex {i} is at the origin"
        );
        for q in &triples[i + 1..] {
            let d = ((p.x - q.x).powi(2) + (p.y - q.y).powi(2) + (p.z - q.z).powi(2)).sqrt();
            assert!(d > 1e-6, "duplicate position {p:?}");
        }
    }
}

#[test]
fn cycle_layout_is_centered_on_the_origin() {
    let g = directed_cycle(8);
    let layout = layout_of(&g, &opts(Dimensions::Two));
    let mean = layout.mean();
    assert!(mean.x.abs() < 1e-9 && mean.y.abs() < 1e-9);
}

#[test]
fn single_isolated_vertex_lands_on_the_origin() {
    let mut g = MemoryGraph::with_vertices(1);
    g.set_position(0, Position::new(3.0, 4.0, 5.0)).unwrap();

    arrange(&mut g, &opts(Dimensions::Three)).unwrap();
    assert_eq!(g.position(0), Position::new(0.0, 0.0, 0.0));
}

#[test]
fn empty_graphs_are_rejected() {
    let mut g = MemoryGraph::new();
    assert!(matches!(
        arrange(&mut g, &opts(Dimensions::Two)),
        Err(Error::EmptyGraph)
    ));
}

#[test]
fn invalid_options_are_rejected_before_any_work() {
    let mut g = path_graph(3);
    let options = ArrangeOptions {
        scale: f64::NAN,
        ..opts(Dimensions::Two)
    };
    assert!(matches!(
        arrange(&mut g, &options),
        Err(Error::InvalidOptions { .. })
    ));
}

#[test]
fn a_cancelled_token_leaves_positions_untouched() {
    let mut g = path_graph(10);
    for v in 0..10 {
        g.set_position(v, Position::new(1.0, 2.0, 3.0)).unwrap();
    }
    let cancel = AtomicBool::new(true);
    let res = arrange_with(&mut g, &opts(Dimensions::Three), &mut stub_rng(), &cancel);
    assert!(matches!(res, Err(Error::Cancelled)));
    for v in g.vertices() {
        assert_eq!(g.position(v), Position::new(1.0, 2.0, 3.0));
    }
}

struct CancelAfter {
    polls: Cell<usize>,
    limit: usize,
}

impl Cancellation for CancelAfter {
    fn is_cancelled(&self) -> bool {
        let n = self.polls.get() + 1;
        self.polls.set(n);
        n > self.limit
    }
}

#[test]
fn cancellation_between_pivots_aborts_the_run() {
    let mut g = path_graph(30);
    let cancel = CancelAfter {
        polls: Cell::new(0),
        limit: 4,
    };
    let res = arrange_with(&mut g, &opts(Dimensions::Two), &mut stub_rng(), &cancel);
    assert!(matches!(res, Err(Error::Cancelled)));
    assert_eq!(cancel.polls.get(), 5);
    for v in g.vertices() {
        assert_eq!(g.position(v), Position::default());
    }
}

#[test]
fn sparse_identifier_spaces_are_laid_out() {
    let mut g = MemoryGraph::with_vertices(10);
    g.set_path(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
    g.remove_vertex(3).unwrap();
    g.remove_vertex(7).unwrap();
    g.add_edge(2, 4).unwrap();
    g.add_edge(6, 8).unwrap();
    assert_eq!(g.vertex_capacity(), 10);

    let layout = layout_of(&g, &opts(Dimensions::Two));
    let ids: BTreeSet<u32> = layout.positions.keys().copied().collect();
    assert_eq!(ids, [0, 1, 2, 4, 5, 6, 8, 9].into_iter().collect());
    assert!(
        layout
            .positions
            .values()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    );
}

#[test]
fn disconnected_graphs_give_every_component_a_pivot() {
    let mut g = MemoryGraph::with_vertices(8);
    g.set_path(&[0, 1, 2, 3]).unwrap();
    g.set_path(&[4, 5, 6, 7]).unwrap();

    for policy in [
        UnreachedPolicy::Sentinel,
        UnreachedPolicy::Clamp,
        UnreachedPolicy::Exclude,
    ] {
        let options = ArrangeOptions {
            pivot_count: 2,
            unreached: policy,
            ..opts(Dimensions::Two)
        };
        let layout = layout_of(&g, &options);
        assert_eq!(layout.pivots, vec![0, 4], "{policy:?}");
        assert!(
            layout
                .positions
                .values()
                .all(|p| p.x.is_finite() && p.y.is_finite()),
            "{policy:?}"
        );
    }
}

#[test]
fn preserve_mean_keeps_the_previous_centroid() {
    let mut g = path_graph(6);
    for v in 0..6 {
        g.set_position(v, Position::new(100.0 + v as f64, -50.0, 9.0)).unwrap();
    }
    let options = ArrangeOptions {
        preserve_mean: true,
        ..opts(Dimensions::Two)
    };
    arrange(&mut g, &options).unwrap();

    let n = g.vertex_count() as f64;
    let mx: f64 = g.vertices().map(|v| g.position(v).x).sum::<f64>() / n;
    let my: f64 = g.vertices().map(|v| g.position(v).y).sum::<f64>() / n;
    assert!((mx - 102.5).abs() < 1e-9);
    assert!((my + 50.0).abs() < 1e-9);
    assert!(g.vertices().all(|v| g.position(v).z == 9.0));
}

#[test]
fn options_load_from_json() {
    let options: ArrangeOptions = serde_json::from_str(
        r#"{ "dimensions": 3, "pivot_count": 10, "unreached": "exclude", "random_seed": 4 }"#,
    )
    .unwrap();
    assert_eq!(options.dimensions, Dimensions::Three);
    assert_eq!(options.pivot_count, 10);
    assert_eq!(options.unreached, UnreachedPolicy::Exclude);
    assert_eq!(options.random_seed, Some(4));
    assert_eq!(options.scale, 10.0);

    assert!(serde_json::from_str::<ArrangeOptions>(r#"{ "dimensions": 4 }"#).is_err());
}
