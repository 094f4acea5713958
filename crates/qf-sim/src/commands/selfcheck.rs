use std::error::Error;
use std::f64::consts::PI;

use clap::Args;
use qf_core::Grid;
use qf_lattice::laplacian;

#[derive(Args, Debug)]
pub struct SelfcheckArgs {
    /// Number of grid points.
    #[arg(long, default_value_t = 100)]
    pub points: usize,
    /// Domain length.
    #[arg(long, default_value_t = 100.0)]
    pub length: f64,
    /// Absolute tolerance against the analytic second derivative.
    #[arg(long, default_value_t = 0.1)]
    pub tolerance: f64,
    /// Exit with an error when the check fails.
    #[arg(long)]
    pub strict: bool,
}

/// Largest deviation of the periodic Laplacian of `sin(2 pi x / L)` from
/// `-(2 pi / L)^2 sin(2 pi x / L)`.
pub fn laplacian_error(grid: &Grid) -> f64 {
    let k = 2.0 * PI / grid.length();
    let field: Vec<f64> = grid.coordinates().iter().map(|&x| (k * x).sin()).collect();
    laplacian(&field, grid.spacing())
        .iter()
        .zip(&field)
        .map(|(lap, phi)| (lap + k * k * phi).abs())
        .fold(0.0, f64::max)
}

pub fn run(args: &SelfcheckArgs) -> Result<(), Box<dyn Error>> {
    let grid = Grid::new(args.points, args.length)?;
    let error = laplacian_error(&grid);
    if error <= args.tolerance {
        println!("Laplacian calculation verified. (max error {error:.3e})");
        Ok(())
    } else {
        println!("Warning: Laplacian calculation may be inaccurate. (max error {error:.3e})");
        if args.strict {
            return Err(format!("laplacian error {error} exceeds {}", args.tolerance).into());
        }
        Ok(())
    }
}
