use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

const F32_I64_MULT: f32 = 1_000_000.0;
const MAX_COST: i64 = (2.0 * F32_I64_MULT) as i64;

/// Solves the rectangular linear sum assignment problem minimizing the total cost.
///
/// Returns `(row, column)` pairs sorted by row. Every row and every column is used at most once,
/// and the number of pairs is `min(rows, columns)`. Costs are quantized to `1e-6` for the solver,
/// non-finite costs are treated as the largest cosine distance `2.0`.
///
/// # Parameters
/// * `costs` - row-major cost matrix, all rows must have the same length
///
/// # Panics
/// Panics when the rows of `costs` have different lengths.
///
pub fn linear_sum_assignment(costs: &[Vec<f32>]) -> Vec<(usize, usize)> {
    let rows = costs.len();
    let columns = costs.first().map(|r| r.len()).unwrap_or(0);
    if rows == 0 || columns == 0 {
        return Vec::default();
    }

    // the solver requires rows <= columns
    let transposed = rows > columns;
    let (solver_rows, solver_columns) = if transposed {
        (columns, rows)
    } else {
        (rows, columns)
    };

    let mut weights = Matrix::new(solver_rows, solver_columns, 0i64);
    for (r, row) in costs.iter().enumerate() {
        assert_eq!(row.len(), columns, "Cost matrix rows must have equal length");
        for (c, cost) in row.iter().enumerate() {
            let w = if cost.is_finite() {
                (cost * F32_I64_MULT) as i64
            } else {
                MAX_COST
            };
            if transposed {
                weights[(c, r)] = w;
            } else {
                weights[(r, c)] = w;
            }
        }
    }

    let (_, solution) = kuhn_munkres_min(&weights);

    let mut pairs: Vec<(usize, usize)> = solution
        .into_iter()
        .enumerate()
        .map(|(r, c)| if transposed { (c, r) } else { (r, c) })
        .collect();
    pairs.sort_unstable();
    pairs
}
