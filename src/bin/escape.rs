// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{value_t, App, Arg, ArgMatches};
use escapetime::{
    render_image, ImageSink, IterationParams, Palette, PaletteKind, RenderConfig, RenderRegion,
    Resolution,
};
use failure::{format_err, Error};
use log::{info, LevelFilter};
use num::Complex;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const SEED: &str = "seed";
const ITERATIONS: &str = "iterations";
const EPSILON: &str = "epsilon";
const THREADS: &str = "threads";
const PALETTE: &str = "palette";
const VERBOSE: &str = "verbose";

fn app<'a, 'b>() -> App<'a, 'b> {
    let max_threads = num_cpus::get();

    App::new("escape")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Escape-time fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("mandelbrot.png")
                .help("Output file; the extension picks the format"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1024x1024")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,-2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the rendered region"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.0,2.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the rendered region"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.0,-0.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse seed constant"))
                .help("Constant c added on every iteration"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("10")
                .validator(|s| {
                    validate_range(
                        &s,
                        1u32,
                        std::u32::MAX,
                        "Could not parse iteration count",
                        "Iteration count must be at least 1",
                    )
                })
                .help("Maximum number of iterations per pixel"),
        )
        .arg(
            Arg::with_name(EPSILON)
                .long(EPSILON)
                .short("e")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse step size",
                        "Step size must be positive",
                    )
                })
                .help("Plane distance per pixel; derives the image size from the region"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("plan9")
                .validator(|s| {
                    PaletteKind::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help("Palette: plan9 or grayscale"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
}

fn init_logging(occurrences: u64) {
    let level = match occurrences {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn complex_arg(matches: &ArgMatches, name: &str) -> Result<Complex<f64>, Error> {
    matches
        .value_of(name)
        .and_then(parse_complex)
        .ok_or_else(|| format_err!("Could not parse --{}", name))
}

fn config_from(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let region = RenderRegion::from_corners(
        complex_arg(matches, LEFTLOWER)?,
        complex_arg(matches, RIGHTUPPER)?,
    );

    let resolution = if matches.is_present(EPSILON) {
        Resolution::from_epsilon(&region, value_t!(matches, EPSILON, f64)?)?
    } else {
        let (width, height) = matches
            .value_of(SIZE)
            .and_then(|s| parse_pair::<usize>(s, 'x'))
            .ok_or_else(|| format_err!("Could not parse --{}", SIZE))?;
        Resolution::new(width, height)
    };

    let params = IterationParams::new(
        value_t!(matches, ITERATIONS, u32)?,
        complex_arg(matches, SEED)?,
    );
    let config = RenderConfig::new(region, resolution, params)
        .with_threads(value_t!(matches, THREADS, usize)?);
    config.validate()?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config_from(matches)?;
    let palette = Palette::named(value_t!(matches, PALETTE, PaletteKind)?);
    let output = matches
        .value_of(OUTPUT)
        .map(Path::new)
        .ok_or_else(|| format_err!("No --{} given", OUTPUT))?;

    let canvas = render_image(&config, &palette)?;
    canvas.save(output)?;
    info!("Wrote {}", output.display());
    Ok(())
}

fn main() {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of(VERBOSE));

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
