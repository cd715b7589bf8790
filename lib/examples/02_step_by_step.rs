use parallel_texture_synthesis as ts;

// Drives the analyzer and synthesizer directly, saving the result of every
// level along the way
fn main() -> Result<(), ts::Error> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "imgs/1.jpg".to_owned());

    let exemplar = ts::image::open(&path)?.to_rgb();
    let exemplar = ts::image::imageops::resize(
        &exemplar,
        64,
        64,
        ts::image::imageops::FilterType::CatmullRom,
    );

    let analysis = ts::Analyzer::new(ts::to_color_image(&exemplar))?.analyze(num_cpus::get())?;

    let mut synth = ts::Synthesizer::new(
        &analysis,
        ts::SynthesisParams {
            output_size: ts::Dims::square(256),
            max_thread_count: num_cpus::get(),
            ..ts::SynthesisParams::default()
        },
    )?;

    std::fs::create_dir_all("out")?;
    for (level, img) in analysis.pyramid().pyramid.iter().enumerate() {
        ts::to_rgb8(img).save(format!("out/02_pyramid_{}.png", level))?;
    }

    while !synth.done() {
        synth.step()?;

        let level = synth.current_exemplar_level();
        ts::to_rgb8(&synth.result()).save(format!("out/02_level_{}.png", level))?;
    }

    ts::to_rgb8(&synth.result_patches()).save("out/02_patches.png")?;
    Ok(())
}
