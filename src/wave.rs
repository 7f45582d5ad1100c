//! Cloth wave displacement.
//!
//! The flag is pinned along its pole edge and flutters more the further a
//! vertex sits from it. Displacement is a sum of three sinusoids in the rest
//! position and elapsed time, weighted by the squared edge distance.

/// Half the cloth width; rest X runs from `-HALF_WIDTH` (pole) to `HALF_WIDTH`
pub const HALF_WIDTH: f64 = 0.6;
pub const WIDTH: f64 = HALF_WIDTH * 2.0;

/// (amplitude, time frequency, x frequency, y frequency, use cosine)
const TERMS: [(f64, f64, f64, f64, bool); 3] = [
    (0.04, 3.0, 6.0, 0.0, false),
    (0.02, 2.5, 0.0, 4.0, true),
    (0.01, 4.0, 12.0, 8.0, false),
];

/// Upper bound on `|wave_offset|` for any input
pub const AMPLITUDE: f64 = 0.04 + 0.02 + 0.01;

/// Distance from the pole edge, 0 at the attached edge and 1 at the free edge
pub fn edge_distance(x: f64) -> f64 {
    ((x + HALF_WIDTH) / WIDTH).clamp(0.0, 1.0)
}

/// Z displacement of a cloth vertex at rest position `(x, y)` and time `t`
pub fn wave_offset(x: f64, y: f64, t: f64) -> f64 {
    let edge = edge_distance(x);
    let strength = edge * edge;

    let sum: f64 = TERMS
        .iter()
        .map(|&(amplitude, ft, fx, fy, cosine)| {
            let phase = t * ft + x * fx + y * fy;
            let s = if cosine { phase.cos() } else { phase.sin() };
            s * amplitude
        })
        .sum();

    sum * strength
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_at_pole_edge() {
        for i in 0..200 {
            let t = i as f64 * 0.173;
            for j in 0..16 {
                let y = -0.4 + j as f64 * 0.8 / 15.0;
                assert_eq!(wave_offset(-HALF_WIDTH, y, t), 0.0);
            }
        }
    }

    #[test]
    fn bounded_by_amplitude() {
        for i in 0..500 {
            let t = i as f64 * 0.05;
            for j in 0..=20 {
                let x = -HALF_WIDTH + j as f64 * WIDTH / 20.0;
                let y = (j as f64 * 0.37).sin() * 0.4;
                assert!(wave_offset(x, y, t).abs() <= AMPLITUDE);
            }
        }
    }

    #[test]
    fn continuous_in_time() {
        // Lipschitz bound: sum of amplitude * time frequency
        let lipschitz = 0.04 * 3.0 + 0.02 * 2.5 + 0.01 * 4.0;
        let dt = 1e-3;
        for i in 0..2000 {
            let t = i as f64 * dt;
            let a = wave_offset(HALF_WIDTH, 0.1, t);
            let b = wave_offset(HALF_WIDTH, 0.1, t + dt);
            assert!((a - b).abs() <= lipschitz * dt + 1e-12);
        }
    }

    #[test]
    fn free_edge_moves() {
        let moved = (0..100)
            .map(|i| wave_offset(HALF_WIDTH, 0.0, i as f64 * 0.1).abs())
            .fold(0.0, f64::max);
        assert!(moved > 0.03);
    }

    #[test]
    fn strength_grows_quadratically() {
        assert_eq!(edge_distance(-HALF_WIDTH), 0.0);
        assert_eq!(edge_distance(HALF_WIDTH), 1.0);
        assert!((edge_distance(0.0) - 0.5).abs() < 1e-12);
        assert_eq!(edge_distance(5.0), 1.0);
    }
}
