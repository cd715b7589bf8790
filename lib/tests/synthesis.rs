use parallel_texture_synthesis as ts;

const QUADRANTS: [[u8; 3]; 4] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]];

// 8x8 exemplar with a distinct color in each 4x4 quadrant
fn quadrants() -> image::RgbImage {
    image::RgbImage::from_fn(8, 8, |x, y| {
        image::Rgb(QUADRANTS[(x / 4 + (y / 4) * 2) as usize])
    })
}

fn quadrant_exemplar() -> ts::ColorImage {
    ts::to_color_image(&quadrants())
}

fn params(size: u32) -> ts::SynthesisParams {
    ts::SynthesisParams {
        output_size: ts::Dims::square(size),
        jitter_strength: 0.0,
        max_thread_count: 2,
        ..ts::SynthesisParams::default()
    }
}

#[test]
fn pyramid_levels_halve() {
    let analysis = ts::Analyzer::new(quadrant_exemplar())
        .unwrap()
        .analyze(1)
        .unwrap();
    let pyramid = analysis.pyramid();

    // log2(8) + 1
    assert_eq!(pyramid.levels(), 4);
    for l in 0..pyramid.levels() - 1 {
        let (w, h) = pyramid.level(l).dimensions();
        assert_eq!(pyramid.level(l + 1).dimensions(), (w / 2, h / 2));
    }
    assert_eq!(pyramid.bottom(), analysis.exemplar());
}

#[test]
fn wraparound() {
    let img = quadrant_exemplar();

    for x in -3..11 {
        for k in -3..3 {
            assert_eq!(ts::modulo(x + k * 8, 8), ts::modulo(x, 8));
            assert_eq!(
                ts::wrapped_pixel(&img, x + k * 8, 2),
                ts::wrapped_pixel(&img, x, 2)
            );
        }
    }
}

#[test]
fn quadrant_end_to_end() {
    let analysis = ts::Analyzer::new(quadrant_exemplar())
        .unwrap()
        .analyze(2)
        .unwrap();
    assert_eq!(analysis.num_levels(), 4);

    let mut synth = ts::Synthesizer::new(&analysis, params(16)).unwrap();
    assert_eq!(synth.current_exemplar_level(), 3);

    // the coarse seed points every cell at the exemplar's center
    let initial = synth.current_field().clone();
    assert_eq!(initial.dims(), ts::Dims::square(2));
    assert_eq!(initial.get(0, 0), ts::Coord::new(4, 4));

    let seeded = synth.colorize(0).unwrap();
    assert_eq!(
        seeded.get_pixel(0, 0).0,
        ts::wrapped_pixel(analysis.stack().level(3), 4, 4)
    );

    let mut steps = 0;
    while !synth.done() {
        synth.step().unwrap();
        steps += 1;

        let field = synth.current_field();
        assert_eq!(field.width(), 2 << steps);
    }

    assert_eq!(steps, 3);
    assert_eq!(synth.fields().len(), 4);
    assert_eq!(synth.current_exemplar_level(), 0);
    assert!(matches!(synth.step(), Err(ts::Error::SynthesisComplete)));
    assert!(matches!(
        synth.colorize(4),
        Err(ts::Error::StepOutOfRange(4, 4))
    ));

    // the result only copies exemplar pixels
    let result = ts::to_rgb8(&synth.result());
    assert_eq!(result.dimensions(), (16, 16));
    for pixel in result.pixels() {
        assert!(QUADRANTS.contains(&pixel.0), "unexpected color {:?}", pixel);
    }
}

#[test]
fn upsample_keeps_children_together() {
    let analysis = ts::Analyzer::new(quadrant_exemplar())
        .unwrap()
        .analyze(1)
        .unwrap();

    let synth = ts::Synthesizer::new(&analysis, params(16)).unwrap();
    let parent = synth.current_field();
    let spacing = 4;
    let child = parent.upsample(spacing);

    for y in 0..child.height() {
        for x in 0..child.width() {
            let p = parent.get(x / 2, y / 2);
            let c = child.get(x, y);
            assert!(c.x >= p.x && c.x - p.x <= spacing);
            assert!(c.y >= p.y && c.y - p.y <= spacing);
        }
    }
}

#[test]
fn sessions_are_reproducible() {
    let run = |threads| {
        ts::Session::builder()
            .add_example(image::DynamicImage::ImageRgb8(quadrants()))
            .output_size(ts::Dims::new(24, 20))
            .jitter_policy(ts::JitterPolicy::Uniform)
            .jitter_strength(3.0)
            .seed(42)
            .max_thread_count(threads)
            .build()
            .unwrap()
            .run(None)
            .unwrap()
            .into_image()
    };

    let serial = run(1);
    assert_eq!(serial.to_rgb().dimensions(), (24, 20));
    assert_eq!(serial.to_bytes(), run(3).to_bytes());
}

#[test]
fn session_writes_outputs() {
    let generated = ts::Session::builder()
        .add_example(image::DynamicImage::ImageRgb8(quadrants()))
        .output_size(ts::Dims::square(16))
        .jitter_strength(0.0)
        .max_thread_count(2)
        .build()
        .unwrap()
        .run(None)
        .unwrap();

    let dir = std::env::temp_dir().join(format!("pts-session-{}", std::process::id()));
    generated.save(dir.join("out.png")).unwrap();
    generated.save_patches(dir.join("patches.png")).unwrap();
    generated.save_debug(dir.join("debug")).unwrap();

    let saved = image::open(dir.join("out.png")).unwrap().to_rgb();
    assert_eq!(&saved, generated.as_ref());

    for step in 0..4 {
        let name = format!("step_{}_level_{}.png", step, 3 - step);
        assert!(dir.join("debug").join(name).exists());
    }
    assert!(dir.join("debug").join("patches.png").exists());

    let mut png = Vec::new();
    generated
        .write(&mut png, image::ImageOutputFormat::Png)
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgb();
    assert_eq!(decoded, saved);

    std::fs::remove_dir_all(&dir).unwrap();
}
