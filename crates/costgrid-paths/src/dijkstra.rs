use std::collections::BinaryHeap;

use costgrid_core::{CellId, GridError, Raster};

use crate::error::{CellRole, Error};
use crate::search::{NO_OWNER, NodeRef, Predecessors, ShortestPaths};
use crate::traits::{Edge, Pather};

/// Compute a multi-source least-cost map.
///
/// Every source starts at cost 0 and the cheapest frontier cell is settled
/// first. When two sources reach a cell at the same cost, the lower source id
/// claims it, whatever order the sources were given in. Repeated sources are
/// seeded once. Fails if a source is out of range or impassable.
pub fn shortest_paths<P: Pather>(pather: &P, sources: &[CellId]) -> Result<ShortestPaths, Error> {
    search(pather, sources, None)
}

/// Check that every source is in range and passable.
pub(crate) fn validate_sources<P: Pather>(pather: &P, sources: &[CellId]) -> Result<(), Error> {
    let shape = pather.shape();
    for &src in sources {
        let at = shape.rowcol(src)?;
        if !pather.is_passable(src) {
            return Err(Error::BarrierCell {
                role: CellRole::Source,
                at,
            });
        }
    }
    Ok(())
}

/// Multi-source expansion. With `stop_at`, expansion ends as soon as that
/// cell is settled; its cost and traceback chain are final at that point.
pub(crate) fn search<P: Pather>(
    pather: &P,
    sources: &[CellId],
    stop_at: Option<CellId>,
) -> Result<ShortestPaths, Error> {
    validate_sources(pather, sources)?;
    let shape = pather.shape();
    if let Some(target) = stop_at {
        if target >= shape.len() {
            return Err(GridError::InvalidCellId {
                id: target,
                len: shape.len(),
            }
            .into());
        }
    }

    let len = shape.len();
    let mut costs = vec![f64::INFINITY; len];
    let mut owners = vec![NO_OWNER; len];
    let mut settled = vec![false; len];
    let mut predecessors = Predecessors::unlinked(shape);
    let mut seeded = Vec::with_capacity(sources.len());

    let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();

    // Seed sources. A source owns itself, which also marks it as a source.
    for &src in sources {
        if owners[src] == src {
            log::debug!("ignoring repeated source {src}");
            continue;
        }
        costs[src] = 0.0;
        owners[src] = src;
        seeded.push(src);
        open.push(NodeRef {
            idx: src,
            cost: 0.0,
            owner: src,
        });
    }

    let mut buf: Vec<Edge> = Vec::with_capacity(8);
    let mut n_settled = 0usize;

    while let Some(current) = open.pop() {
        let ci = current.idx;
        // Skip stale entries.
        if settled[ci] || current.cost != costs[ci] || current.owner != owners[ci] {
            continue;
        }
        settled[ci] = true;
        n_settled += 1;
        if stop_at == Some(ci) {
            break;
        }

        let owner = owners[ci];
        buf.clear();
        pather.edges(ci, &mut buf);

        for &Edge { to, weight } in buf.iter() {
            if settled[to] || owners[to] == to {
                continue;
            }
            let tentative = current.cost + weight;
            let better = tentative < costs[to] || (tentative == costs[to] && owner < owners[to]);
            if !better {
                continue;
            }
            costs[to] = tentative;
            owners[to] = owner;
            predecessors.set(to, ci);
            open.push(NodeRef {
                idx: to,
                cost: tentative,
                owner,
            });
        }
    }

    log::debug!(
        "expansion settled {n_settled} of {len} cells from {} sources",
        seeded.len()
    );

    Ok(ShortestPaths {
        costs: Raster::from_vec(shape, costs)?,
        predecessors,
        owners: Raster::from_vec(shape, owners)?,
        sources: seeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DIAGONAL_LENGTH;
    use crate::graph::build_graph;
    use crate::search::NO_PREDECESSOR;
    use crate::surface::CostSurface;
    use approx::assert_relative_eq;
    use costgrid_core::{RowCol, Shape};
    use rand::rngs::SmallRng;
    use rand::{RngExt, SeedableRng};

    fn uniform(nrows: usize, ncols: usize) -> CostSurface {
        CostSurface::new(Raster::new(Shape::new(nrows, ncols), 1.0))
    }

    fn random_costs(rng: &mut SmallRng, shape: Shape) -> Raster<f64> {
        let data = (0..shape.len()).map(|_| rng.random_range(0.1..10.0)).collect();
        Raster::from_vec(shape, data).unwrap()
    }

    #[test]
    fn source_has_zero_cost_and_no_predecessor() {
        let s = uniform(3, 3);
        let sp = shortest_paths(&s, &[4]).unwrap();
        assert_eq!(sp.costs()[4], 0.0);
        assert_eq!(sp.predecessors().get(4), None);
        assert_eq!(sp.owners()[4], 4);
        assert_eq!(sp.sources(), &[4]);
    }

    #[test]
    fn uniform_grid_costs_follow_chebyshev_moves() {
        let s = uniform(3, 3);
        let sp = shortest_paths(&s, &[0]).unwrap();
        assert_relative_eq!(sp.costs()[1], 1.0);
        assert_relative_eq!(sp.costs()[4], DIAGONAL_LENGTH);
        assert_relative_eq!(sp.costs()[8], 2.0 * DIAGONAL_LENGTH);
        assert_relative_eq!(sp.costs()[5], 1.0 + DIAGONAL_LENGTH);
        assert_eq!(sp.predecessors().get(8), Some(4));
        assert_eq!(sp.predecessors().get(4), Some(0));
    }

    #[test]
    fn barriers_are_unreached_and_never_predecessors() {
        let costs = Raster::from_rows(vec![
            vec![1.0, -1.0, 1.0],
            vec![1.0, -1.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        let s = CostSurface::new(costs);
        let sp = shortest_paths(&s, &[0]).unwrap();
        assert_eq!(sp.costs()[1], f64::INFINITY);
        assert_eq!(sp.owners()[4], NO_OWNER);
        assert!(sp.costs()[2].is_finite());
        assert!(
            sp.predecessors()
                .as_slice()
                .iter()
                .all(|&p| p != 1 && p != 4)
        );
    }

    #[test]
    fn walled_off_region_stays_unreached() {
        let costs = Raster::from_rows(vec![vec![1.0, -1.0, 1.0], vec![1.0, -1.0, 1.0]]).unwrap();
        let s = CostSurface::new(costs);
        let sp = shortest_paths(&s, &[0]).unwrap();
        assert_eq!(sp.costs()[2], f64::INFINITY);
        assert_eq!(sp.predecessors().as_slice()[2], NO_PREDECESSOR);
        assert!(!sp.is_reached(5));
        assert!(sp.is_reached(3));
    }

    #[test]
    fn barrier_source_is_rejected() {
        let costs = Raster::from_rows(vec![vec![1.0, -1.0]]).unwrap();
        let err = shortest_paths(&CostSurface::new(costs), &[1]).unwrap_err();
        assert_eq!(
            err,
            Error::BarrierCell {
                role: CellRole::Source,
                at: RowCol::new(0, 1)
            }
        );
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let err = shortest_paths(&uniform(2, 2), &[4]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn repeated_sources_are_seeded_once() {
        let sp = shortest_paths(&uniform(2, 2), &[3, 0, 3]).unwrap();
        assert_eq!(sp.sources(), &[3, 0]);
    }

    #[test]
    fn no_sources_reaches_nothing() {
        let sp = shortest_paths(&uniform(2, 2), &[]).unwrap();
        assert!(sp.costs().iter().all(|c| c.is_infinite()));
        assert!(sp.owners().iter().all(|&o| o == NO_OWNER));
    }

    #[test]
    fn equal_cost_ties_go_to_lowest_source_id() {
        // 1x3 corridor: the middle cell is equidistant from both ends.
        let s = uniform(1, 3);
        let forward = shortest_paths(&s, &[0, 2]).unwrap();
        let reverse = shortest_paths(&s, &[2, 0]).unwrap();
        assert_eq!(forward.owners()[1], 0);
        assert_eq!(reverse.owners()[1], 0);
        assert_eq!(forward.predecessors(), reverse.predecessors());
    }

    #[test]
    fn sources_are_never_claimed_by_other_sources() {
        // Flat DEM: every edge weighs zero, so every cell ties at cost 0.
        let dem = Raster::new(Shape::new(3, 4), 3.0);
        let g = build_graph(&dem, None, false, false).unwrap();
        let sp = shortest_paths(&g, &[11, 5, 0]).unwrap();
        for src in [11, 5, 0] {
            assert_eq!(sp.owners()[src], src);
            assert_eq!(sp.predecessors().get(src), None);
        }
        assert!(sp.costs().iter().all(|&c| c == 0.0));
        // Every tie resolves to the lowest source id.
        for id in 0..12 {
            if id != 5 && id != 11 {
                assert_eq!(sp.owners()[id], 0, "cell {id}");
            }
        }
    }

    #[test]
    fn early_stop_matches_full_expansion_at_target() {
        let mut rng = SmallRng::seed_from_u64(11);
        let shape = Shape::new(9, 7);
        let s = CostSurface::new(random_costs(&mut rng, shape));
        let full = shortest_paths(&s, &[3]).unwrap();
        let target = 58;
        let partial = search(&s, &[3], Some(target)).unwrap();
        assert_eq!(partial.costs()[target], full.costs()[target]);
        let mut a = target;
        while let Some(p) = full.predecessors().get(a) {
            assert_eq!(partial.predecessors().get(a), Some(p));
            a = p;
        }
    }

    #[test]
    fn grid_native_costs_are_symmetric() {
        let mut rng = SmallRng::seed_from_u64(42);
        let shape = Shape::new(8, 10);
        let s = CostSurface::new(random_costs(&mut rng, shape));
        for _ in 0..10 {
            let a = rng.random_range(0..shape.len());
            let b = rng.random_range(0..shape.len());
            let ab = shortest_paths(&s, &[a]).unwrap().costs()[b];
            let ba = shortest_paths(&s, &[b]).unwrap().costs()[a];
            assert_relative_eq!(ab, ba, max_relative = 1e-9);
        }
    }

    #[test]
    fn uphill_only_never_lowers_costs() {
        let mut rng = SmallRng::seed_from_u64(7);
        let shape = Shape::new(10, 10);
        let dem = random_costs(&mut rng, shape);
        let free = build_graph(&dem, None, false, false).unwrap();
        let uphill = build_graph(&dem, None, true, false).unwrap();
        let sources = [0, 55, 99];
        let free_sp = shortest_paths(&free, &sources).unwrap();
        let up_sp = shortest_paths(&uphill, &sources).unwrap();
        for id in 0..shape.len() {
            let (f, u) = (free_sp.costs()[id], up_sp.costs()[id]);
            assert!(u >= f - 1e-9, "cell {id}: uphill {u} < unrestricted {f}");
        }
    }

    #[test]
    fn directional_search_respects_edge_direction() {
        // Elevation rises to the east; uphill-only cannot move west.
        let dem = Raster::from_rows(vec![vec![0.0, 1.0, 2.0]]).unwrap();
        let g = build_graph(&dem, None, true, false).unwrap();
        let from_west = shortest_paths(&g, &[0]).unwrap();
        assert_relative_eq!(from_west.costs()[2], 2.0);
        let from_east = shortest_paths(&g, &[2]).unwrap();
        assert_eq!(from_east.costs()[0], f64::INFINITY);
    }
}
