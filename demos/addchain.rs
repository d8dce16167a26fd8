use adamat::AdaptiveArray;
use faer::Mat;
use rand::Rng;
use std::time::Instant;

/// Sum a chain of matrices three ways: raw dense, raw CSR through the
/// adaptive container pinned sparse, and fully adaptive.
fn main() {
    let n = 400;
    let length = 8;
    let density = 0.02;

    let mut rng = rand::thread_rng();
    let grids: Vec<Mat<f64>> = (0..length)
        .map(|_| {
            Mat::from_fn(n, n, |_, _| {
                if rng.r#gen::<f64>() < density {
                    rng.r#gen::<f64>()
                } else {
                    0.0
                }
            })
        })
        .collect();

    // dense chain
    let start = Instant::now();
    let mut dense_sum = grids[0].clone();
    for g in &grids[1..] {
        dense_sum = &dense_sum + g;
    }
    println!("dense chain:    {:?}", start.elapsed());

    // adaptive chain: starts dense, sparsifies on the first adapt and stays
    // sparse while the accumulated density remains below the crossover
    let start = Instant::now();
    let mut arrays: Vec<AdaptiveArray<f64>> =
        grids.iter().map(|g| AdaptiveArray::from_dense(g.clone())).collect();
    let mut rest = arrays.split_off(1);
    let mut sum = arrays.pop().unwrap();
    for other in rest.iter_mut() {
        sum = sum.add_array(other).unwrap();
    }
    println!("adaptive chain: {:?}", start.elapsed());
    println!(
        "result layout: {}, bounds: {:?}",
        if sum.is_sparse() { "sparse" } else { "dense" },
        sum.bounds()
    );

    let diff = &sum.to_dense() - &dense_sum;
    let max_err = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| diff[(i, j)].abs())
        .fold(0.0f64, f64::max);
    println!("max |adaptive - dense| = {max_err:e}");
}
