use dctform_rs::TransformKernel;
use dctform_rs::dct::BlockTransform;
use std::time::Instant;

fn main() {
    println!("Benchmarking DCT kernels...");

    for block_size in [8usize, 16, 32] {
        let input: Vec<f64> = (0..block_size * block_size)
            .map(|k| ((k * 37 + 11) % 256) as f64)
            .collect();
        let iterations = 200_000 / (block_size * block_size);

        let direct = match BlockTransform::new(block_size, TransformKernel::Direct) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };
        let separable = match BlockTransform::new(block_size, TransformKernel::Separable) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        let mut coeffs_direct = vec![0.0f64; block_size * block_size];
        let mut output_direct = vec![0.0f64; block_size * block_size];
        let start = Instant::now();
        for _ in 0..iterations {
            direct.forward_block(&input, &mut coeffs_direct);
            direct.inverse_block(&coeffs_direct, &mut output_direct);
            // prevent optimization
            std::hint::black_box(&output_direct);
        }
        let duration_direct = start.elapsed();

        let mut coeffs_separable = vec![0.0f64; block_size * block_size];
        let mut output_separable = vec![0.0f64; block_size * block_size];
        let start = Instant::now();
        for _ in 0..iterations {
            separable.forward_block(&input, &mut coeffs_separable);
            separable.inverse_block(&coeffs_separable, &mut output_separable);
            std::hint::black_box(&output_separable);
        }
        let duration_separable = start.elapsed();

        println!("Block size {}:", block_size);
        println!("  Direct:    {:?} for {} iterations", duration_direct, iterations);
        println!("  Separable: {:?} for {} iterations", duration_separable, iterations);
        let speedup = duration_direct.as_secs_f64() / duration_separable.as_secs_f64();
        println!("  Speedup:   {:.2}x", speedup);

        let max_diff = coeffs_direct
            .iter()
            .zip(&coeffs_separable)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f64, f64::max);
        println!("  Max coefficient difference: {:e}", max_diff);
        if max_diff < 1e-9 {
            println!("  Accuracy: PASSED (Tolerance < 1e-9)");
        } else {
            println!("  Accuracy: FAILED (Tolerance > 1e-9)");
        }
    }
}
