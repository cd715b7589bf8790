use parallel_texture_synthesis as ts;

fn main() -> Result<(), ts::Error> {
    // synthesize from the image given on the command line, or a generated
    // brick pattern if there is none
    let exemplar = match std::env::args().nth(1) {
        Some(path) => ts::image::open(path)?,
        None => ts::image::DynamicImage::ImageRgb8(bricks()),
    };

    //create a new session
    let texsynth = ts::Session::builder()
        .add_example(exemplar)
        .output_size(ts::Dims::square(256))
        .kappa(0.5)
        .build()?;

    //generate an image
    let generated = texsynth.run(None)?;

    //save the image and where every pixel came from to the disk
    generated.save_patches("out/01_patches.png")?;
    generated.save("out/01.png")
}

fn bricks() -> ts::image::RgbImage {
    ts::image::RgbImage::from_fn(64, 64, |x, y| {
        let row = y / 8;
        let x = if row % 2 == 0 { x } else { x + 8 };
        if y % 8 == 0 || x % 16 == 0 {
            ts::image::Rgb([200, 200, 190])
        } else {
            let shade = ((x * 7 + y * 13) % 40) as u8;
            ts::image::Rgb([150 + shade, 60 + shade / 2, 40])
        }
    })
}
