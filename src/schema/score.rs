//! Magic line scoring for cube states.
//!
//! A line scores when its cells sum to the magic constant `n(n³+1)/2`.
//! For an `n×n×n` cube the candidate lines are:
//!
//! - `3n²` straight lines (rows, columns, pillars)
//! - `6n` plane diagonals (two per axis-aligned slice)
//! - `4` space diagonals
//!
//! giving 109 lines for the 5×5×5 instance.

use super::Layer;

/// Magic constant for a cube of order `n` filled with `1..=n³`.
#[inline]
pub fn magic_constant(n: usize) -> i64 {
    let n = n as i64;
    n * (n * n * n + 1) / 2
}

/// Total number of scoring lines for a cube of order `n`.
#[inline]
pub fn max_line_count(n: usize) -> u32 {
    (3 * n * n + 6 * n + 4) as u32
}

/// Order of the cube if every layer is `n×n` with `n` layers.
pub fn cube_order(cube: &[Layer]) -> Option<usize> {
    let n = cube.len();
    if n == 0 {
        return None;
    }
    let cubic = cube
        .iter()
        .all(|layer| layer.len() == n && layer.iter().all(|row| row.len() == n));
    cubic.then_some(n)
}

/// Count lines summing to the magic constant. Non-cubic input scores 0.
pub fn magic_line_count(cube: &[Layer]) -> u32 {
    let Some(n) = cube_order(cube) else {
        return 0;
    };
    let magic = magic_constant(n);
    let at = |i: usize, j: usize, k: usize| cube[i][j][k];

    let mut count = 0u32;
    let mut score = |hit: bool| count += hit as u32;

    for i in 0..n {
        for j in 0..n {
            score(sums_to(n, magic, &|k: usize| at(i, j, k)));
            score(sums_to(n, magic, &|k: usize| at(i, k, j)));
            score(sums_to(n, magic, &|k: usize| at(k, i, j)));
        }
    }

    let r = |j: usize| n - 1 - j;
    for i in 0..n {
        score(sums_to(n, magic, &|j: usize| at(i, j, j)));
        score(sums_to(n, magic, &|j: usize| at(i, j, r(j))));
        score(sums_to(n, magic, &|j: usize| at(j, i, j)));
        score(sums_to(n, magic, &|j: usize| at(j, i, r(j))));
        score(sums_to(n, magic, &|j: usize| at(j, j, i)));
        score(sums_to(n, magic, &|j: usize| at(j, r(j), i)));
    }

    score(sums_to(n, magic, &|j: usize| at(j, j, j)));
    score(sums_to(n, magic, &|j: usize| at(j, j, r(j))));
    score(sums_to(n, magic, &|j: usize| at(j, r(j), j)));
    score(sums_to(n, magic, &|j: usize| at(j, r(j), r(j))));

    count
}

#[inline]
fn sums_to(n: usize, magic: i64, cell: &dyn Fn(usize) -> i64) -> bool {
    (0..n).map(cell).sum::<i64>() == magic
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, fill: i64) -> Vec<Layer> {
        vec![vec![vec![fill; n]; n]; n]
    }

    #[test]
    fn test_magic_constant() {
        assert_eq!(magic_constant(3), 42);
        assert_eq!(magic_constant(5), 315);
        assert_eq!(max_line_count(5), 109);
    }

    #[test]
    fn test_uniform_cube_scores_every_line() {
        // 63 * 5 == 315
        assert_eq!(magic_line_count(&uniform(5, 63)), 109);
        assert_eq!(magic_line_count(&uniform(3, 14)), max_line_count(3));
    }

    #[test]
    fn test_order_three_magic_cube() {
        let cube = vec![
            vec![vec![8, 24, 10], vec![12, 7, 23], vec![22, 11, 9]],
            vec![vec![15, 1, 26], vec![25, 14, 3], vec![2, 27, 13]],
            vec![vec![19, 17, 6], vec![5, 21, 16], vec![18, 4, 20]],
        ];
        // All 27 straight lines, 4 space diagonals and the 6 diagonals of
        // the central slices.
        assert_eq!(magic_line_count(&cube), 37);
    }

    #[test]
    fn test_non_cubic_scores_zero() {
        assert_eq!(magic_line_count(&[]), 0);
        let ragged = vec![vec![vec![14; 3]; 3], vec![vec![14; 2]; 3], vec![vec![14; 3]; 3]];
        assert_eq!(cube_order(&ragged), None);
        assert_eq!(magic_line_count(&ragged), 0);
    }
}
