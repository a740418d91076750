use mandelrust::{mandelbrot, mandelbrot_mt, render, Engine, RenderConfig, Viewport, MAX_ITER};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn gray_at(pixels: &[u8], width: usize, x: usize, y: usize) -> u8 {
    let offset = (y * width + x) * 3;
    assert_eq!(pixels[offset], pixels[offset + 1]);
    assert_eq!(pixels[offset], pixels[offset + 2]);
    pixels[offset]
}

#[test]
fn default_view_end_to_end() {
    let pixels = mandelbrot(800, 600, -2.0, 1.0, -1.0, 1.0);
    assert_eq!(pixels.len(), 800 * 600 * 3);
    // -2+1i leaves the circle on the first step.
    assert!(gray_at(&pixels, 800, 0, 0) >= 253);
    // -0.5+0i is deep inside the main cardioid.
    assert_eq!(gray_at(&pixels, 800, 400, 300), 0);
    assert_eq!(mandelbrot_mt(800, 600, -2.0, 1.0, -1.0, 1.0).unwrap(), pixels);
}

#[test]
fn engines_agree_on_random_views() {
    let mut rng = StdRng::seed_from_u64(0x6d61_6e64);
    for _ in 0..25 {
        let width: u32 = rng.gen_range(1, 120);
        let height: u32 = rng.gen_range(1, 90);
        let left: f64 = rng.gen_range(-2.5, 0.5);
        let top: f64 = rng.gen_range(-1.5, 0.5);
        let viewport = Viewport::new(
            left,
            left + rng.gen_range(0.001, 2.0),
            top,
            top + rng.gen_range(0.001, 2.0),
        );
        let config = RenderConfig {
            max_iter: rng.gen_range(1, 300),
            threads: rng.gen_range(1, 9),
            stripe_rows: if rng.gen() { None } else { Some(rng.gen_range(1, 20)) },
        };
        let single = render(Engine::SingleThreaded, width, height, viewport, &config).unwrap();
        let multi = render(Engine::MultiThreaded, width, height, viewport, &config).unwrap();
        assert_eq!(single.len(), (width * height * 3) as usize);
        assert!(single == multi, "{}x{} {:?} {:?}", width, height, viewport, config);
    }
}

#[test]
fn degenerate_rasters() {
    assert_eq!(mandelbrot(1, 1, -2.0, 1.0, -1.0, 1.0).len(), 3);
    assert!(mandelbrot(0, 600, -2.0, 1.0, -1.0, 1.0).is_empty());
    assert!(mandelbrot_mt(800, 0, -2.0, 1.0, -1.0, 1.0).unwrap().is_empty());
}

#[test]
fn set_is_symmetric_about_the_real_axis() {
    // Rows y and height - y sample conjugate points when top = -bottom.
    let (width, height) = (60, 64);
    let config = RenderConfig::default();
    let pixels = render(
        Engine::MultiThreaded,
        width,
        height,
        Viewport::new(-2.0, 1.0, -1.0, 1.0),
        &config,
    )
    .unwrap();
    let row = |y: usize| &pixels[y * width as usize * 3..(y + 1) * width as usize * 3];
    for y in 1..height as usize {
        assert_eq!(row(y), row(height as usize - y), "row {}", y);
    }
}

#[test]
fn non_finite_edges_do_not_crash() {
    let nan = std::f64::NAN;
    let single = mandelbrot(8, 6, nan, 1.0, -1.0, 1.0);
    let multi = mandelbrot_mt(8, 6, nan, 1.0, -1.0, 1.0).unwrap();
    assert_eq!(single.len(), 8 * 6 * 3);
    assert_eq!(single, multi);
    let inf = mandelbrot(4, 4, -2.0, std::f64::INFINITY, -1.0, 1.0);
    assert_eq!(inf.len(), 4 * 4 * 3);
}

#[test]
fn iteration_cap_is_a_parameter() {
    let viewport = Viewport::default();
    let low = render(Engine::SingleThreaded, 40, 30, viewport, &RenderConfig::with_max_iter(5)).unwrap();
    let high = render(
        Engine::SingleThreaded,
        40,
        30,
        viewport,
        &RenderConfig::with_max_iter(MAX_ITER),
    )
    .unwrap();
    assert_ne!(low, high);
    let black = |p: &[u8]| p.iter().filter(|&&v| v == 0).count();
    // A lower cap can only let more points look like members.
    assert!(black(&low) >= black(&high));
}

#[test]
fn concurrent_renders_are_independent() {
    let views = [
        Viewport::default(),
        Viewport::new(-0.8, -0.7, 0.05, 0.15),
        Viewport::new(-1.5, -1.0, -0.25, 0.25),
    ];
    let expected: Vec<Vec<u8>> = views
        .iter()
        .map(|v| mandelbrot(50, 40, v.left, v.right, v.top, v.bottom))
        .collect();
    let results: Vec<Vec<u8>> = crossbeam::scope(|spawner| {
        let handles: Vec<_> = views
            .iter()
            .map(|v| spawner.spawn(move |_| mandelbrot_mt(50, 40, v.left, v.right, v.top, v.bottom)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect()
    })
    .unwrap();
    assert_eq!(results, expected);
}

#[test]
fn shading_matches_the_square_root_radius_test() {
    // Straightforward escape time with |z| <= 2 taken through hypot.
    let shade = |c: num::Complex<f64>| {
        let mut z = num::Complex::new(0.0, 0.0);
        let mut n = 0;
        while z.norm() <= 2.0 && n < MAX_ITER {
            z = z * z + c;
            n += 1;
        }
        (255 - n * 255 / MAX_ITER) as u8
    };
    let (width, height) = (800usize, 600usize);
    let (left, right, top, bottom) = (-2.0, 0.5, -1.25, 1.25);
    let single = mandelbrot(width as u32, height as u32, left, right, top, bottom);
    let multi = mandelbrot_mt(width as u32, height as u32, left, right, top, bottom).unwrap();
    assert_eq!(single, multi);
    for y in 0..height {
        for x in 0..width {
            let c = num::Complex::new(
                left + (x as f64 / width as f64) * (right - left),
                bottom + (y as f64 / height as f64) * (top - bottom),
            );
            assert_eq!(gray_at(&single, width, x, y), shade(c), "at x={} y={} c={}", x, y, c);
        }
    }
    // The pixel whose |c|^2 rounds above 4 while |c| rounds to 2.
    assert_eq!(gray_at(&single, width, 128, 588), 250);
}
