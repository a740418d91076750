use clap::{App, Arg, ArgMatches};
use image::ColorType;
use log::info;
use mandelrust::{render, Engine, MandelError, Navigator, RenderConfig, Result, Viewport};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

/// Splits "a<sep>b" and parses both halves, e.g. "800x600" or "-2,1".
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let (first, second) = s.split_once(separator)?;
    Some((first.trim().parse().ok()?, second.trim().parse().ok()?))
}

/// clap validator for values that must parse with `parse_pair`.
fn pair_validator<T: FromStr>(
    separator: char,
    err: &'static str,
) -> impl Fn(String) -> std::result::Result<(), String> {
    move |s| {
        parse_pair::<T>(&s, separator)
            .map(|_| ())
            .ok_or_else(|| err.to_string())
    }
}

/// clap validator for a whole number in `low..=high`.
fn range_validator<T>(
    what: &'static str,
    low: T,
    high: T,
) -> impl Fn(String) -> std::result::Result<(), String>
where
    T: FromStr + PartialOrd + Display + Copy,
{
    move |s| match s.parse::<T>() {
        Ok(n) if n >= low && n <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what.to_lowercase())),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const REAL: &str = "real";
const IMAG: &str = "imag";
const ENGINE: &str = "engine";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const COMPARE: &str = "compare";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get() * 4;

    App::new("mandel")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(COMPARE)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the extension picks the format (.png, .ppm)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(pair_validator::<u32>('x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(REAL)
                .long(REAL)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2,1")
                .validator(pair_validator::<f64>(',', "Could not parse left,right edges"))
                .help("Left and right edges of the view on the real axis"),
        )
        .arg(
            Arg::with_name(IMAG)
                .long(IMAG)
                .short("m")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1,1")
                .validator(pair_validator::<f64>(',', "Could not parse top,bottom edges"))
                .help("Top and bottom edges of the view on the imaginary axis"),
        )
        .arg(
            Arg::with_name(ENGINE)
                .long(ENGINE)
                .short("e")
                .takes_value(true)
                .possible_values(&["single", "multi"])
                .default_value("multi")
                .help("Rendering engine"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(range_validator("Thread count", 1, max_threads))
                .help("Number of threads for the multi engine [default: one per core]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(range_validator("Iteration count", 1usize, 100_000))
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(pair_validator::<f64>(',', "Could not parse zoom point"))
                .help("Zoom in twice on a point given as x,y fractions of the image; repeatable"),
        )
        .arg(
            Arg::with_name(COMPARE)
                .long(COMPARE)
                .help("Render with both engines, report timings and check they agree"),
        )
        .get_matches()
}

fn bad_argument(name: &str, value: &str) -> MandelError {
    MandelError::BadArgument {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn pair_of<T: FromStr>(matches: &ArgMatches, name: &str, separator: char) -> Result<(T, T)> {
    let value = matches.value_of(name).unwrap_or_default();
    parse_pair(value, separator).ok_or_else(|| bad_argument(name, value))
}

fn number_of<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T> {
    let value = matches.value_of(name).unwrap_or_default();
    T::from_str(value).map_err(|_| bad_argument(name, value))
}

fn viewport_of(matches: &ArgMatches) -> Result<Viewport> {
    let (left, right) = pair_of::<f64>(matches, REAL, ',')?;
    let (top, bottom) = pair_of::<f64>(matches, IMAG, ',')?;
    let mut navigator = Navigator::new(Viewport::new(left, right, top, bottom));
    if let Some(points) = matches.values_of(ZOOM) {
        for point in points {
            let (fx, fy) = parse_pair::<f64>(point, ',').ok_or_else(|| bad_argument(ZOOM, point))?;
            navigator.click(fx, fy, mandelrust::navigation::CLICK_ZOOM);
        }
    }
    Ok(navigator.current())
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (u32, u32)) -> Result<()> {
    image::save_buffer(Path::new(outfile), pixels, bounds.0, bounds.1, ColorType::Rgb8)?;
    Ok(())
}

fn timed(
    engine: Engine,
    bounds: (u32, u32),
    viewport: Viewport,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let start = Instant::now();
    let pixels = render(engine, bounds.0, bounds.1, viewport, config)?;
    println!("{}: {:?}", engine, start.elapsed());
    Ok(pixels)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let bounds = pair_of::<u32>(matches, SIZE, 'x')?;
    let viewport = viewport_of(matches)?;
    let config = RenderConfig {
        max_iter: number_of(matches, ITERATIONS)?,
        ..RenderConfig::default()
    };
    let config = match matches.value_of(THREADS) {
        Some(_) => RenderConfig {
            threads: number_of(matches, THREADS)?,
            ..config
        },
        None => config,
    };
    info!("rendering {}x{} of {:?}", bounds.0, bounds.1, viewport);

    let pixels = if matches.is_present(COMPARE) {
        let single = timed(Engine::SingleThreaded, bounds, viewport, &config)?;
        let multi = timed(Engine::MultiThreaded, bounds, viewport, &config)?;
        if single != multi {
            return Err(MandelError::EnginesDisagree);
        }
        println!("engines agree on {} bytes", single.len());
        single
    } else {
        let engine = Engine::from_str(matches.value_of(ENGINE).unwrap_or_default())?;
        render(engine, bounds.0, bounds.1, viewport, &config)?
    };

    if let Some(outfile) = matches.value_of(OUTPUT) {
        write_image(outfile, &pixels, bounds)?;
        info!("wrote {}", outfile);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
