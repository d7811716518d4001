use criterion::{criterion_group, criterion_main, Criterion};
use sgquad::{errors::SGError, grids::global_grid::GlobalGridOptions, grids::sparse_grid::SparseGrid, rules::{RuleType, TypeDepth}};

fn build_grid(depth: i32) -> Result<SparseGrid, SGError>
{
    let options = GlobalGridOptions { depth_type: TypeDepth::Level, ..Default::default() };
    SparseGrid::make_global_grid(4, 1, depth, RuleType::ClenshawCurtis, &options)
}

fn loaded_grid() -> Result<SparseGrid, SGError>
{
    let mut grid = build_grid(6)?;
    let values: Vec<f64> = grid.needed_points().chunks_exact(4).map(|x| (x[0] + 0.5 * x[1] - x[2] * x[3]).exp()).collect();
    grid.load_needed_points(&values)?;
    Ok(grid)
}

fn run_case(c: &mut Criterion)
{
    c.bench_function("clenshaw curtis 4d construction", |b| b.iter(|| build_grid(6).unwrap()));
    let grid = loaded_grid().unwrap();
    c.bench_function("clenshaw curtis 4d integration", |b| b.iter(|| grid.integrate().unwrap()));
    let x = [0.3, -0.2, 0.1, 0.7];
    c.bench_function("clenshaw curtis 4d interpolation", |b| b.iter(|| grid.evaluate(&x).unwrap()));
}

criterion_group!(benches, run_case);
criterion_main!(benches);
