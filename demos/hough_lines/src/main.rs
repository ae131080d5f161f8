use argh::FromArgs;
use std::path::{Path, PathBuf};

use edgeline::image::{Image, ImageSize};
use edgeline::imgproc::{
    self,
    draw::{LINE_COLOR_RED, LINE_THICKNESS},
    edges::{EdgeDetectorConfig, EdgeMaps},
    hough::{HoughAccumulator, HoughLinesConfig},
};

#[derive(FromArgs)]
/// Detect straight lines in an image and draw them on top of it
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to write the image with the detected lines
    #[argh(option, short = 'o')]
    output_path: PathBuf,

    /// optional path to write the binary edge mask
    #[argh(option)]
    edges_path: Option<PathBuf>,

    /// optional path to write the accumulator as an 8-bit image
    #[argh(option)]
    accumulator_path: Option<PathBuf>,

    /// optional JSON file with the detector parameters
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// gradient magnitude threshold, overrides the config file
    #[argh(option)]
    magnitude_threshold: Option<f32>,

    /// angular resolution in degrees, overrides the config file
    #[argh(option)]
    angle_step: Option<f64>,

    /// vote threshold, overrides the config file
    #[argh(option)]
    vote_threshold: Option<u32>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DetectorConfig {
    edges: EdgeDetectorConfig,
    hough: HoughLinesConfig,
}

fn load_config(args: &Args) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DetectorConfig::default(),
    };

    if let Some(threshold) = args.magnitude_threshold {
        config.edges.magnitude_threshold = threshold;
    }
    if let Some(step) = args.angle_step {
        config.hough.angle_step_deg = step;
    }
    if let Some(votes) = args.vote_threshold {
        config.hough.vote_threshold = votes;
    }

    Ok(config)
}

fn read_image_rgb8(path: &Path) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgb8();
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(Image::new(size, img.into_raw())?)
}

fn write_image<const C: usize>(
    path: &Path,
    img: &Image<u8, C>,
    color_type: image::ExtendedColorType,
) -> Result<(), Box<dyn std::error::Error>> {
    image::save_buffer(
        path,
        img.as_slice(),
        img.width() as u32,
        img.height() as u32,
        color_type,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    let config = load_config(&args)?;
    log::info!("using {config:?}");

    // read the image and convert it to intensities in [0, 255]
    let rgb = read_image_rgb8(&args.image_path)?;
    let mut gray = Image::<u8, 1>::from_size_val(rgb.size(), 0)?;
    imgproc::color::gray_from_rgb_u8(&rgb, &mut gray)?;
    let gray = gray.cast::<f32>()?;

    let edges = EdgeMaps::compute(&gray, &config.edges)?;
    log::info!(
        "{} edge pixels in a {} image",
        imgproc::edges::count_edge_pixels(&edges.mask),
        gray.size()
    );

    let acc = HoughAccumulator::from_edges(
        &edges.mask,
        config.hough.angle_step_deg,
        config.hough.strategy,
    )?;
    let lines = acc.peaks(config.hough.vote_threshold);
    log::info!(
        "{} lines above {} votes, max votes {}",
        lines.len(),
        config.hough.vote_threshold,
        acc.max_votes()
    );
    for line in &lines {
        log::debug!(
            "rho = {}, theta = {:.1} deg, votes = {}",
            line.rho,
            line.theta.to_degrees(),
            line.votes
        );
    }

    let mut overlay = rgb.clone();
    imgproc::draw::draw_hough_lines(&mut overlay, &lines, LINE_COLOR_RED, LINE_THICKNESS);
    write_image(&args.output_path, &overlay, image::ExtendedColorType::Rgb8)?;

    if let Some(path) = &args.edges_path {
        write_image(path, &edges.mask, image::ExtendedColorType::L8)?;
    }

    if let Some(path) = &args.accumulator_path {
        write_image(path, &acc.to_image_u8()?, image::ExtendedColorType::L8)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: Option<PathBuf>) -> Args {
        Args {
            image_path: PathBuf::from("in.png"),
            output_path: PathBuf::from("out.png"),
            edges_path: None,
            accumulator_path: None,
            config,
            magnitude_threshold: None,
            angle_step: None,
            vote_threshold: None,
        }
    }

    #[test]
    fn flags_override_config_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{ "edges": {{ "magnitude_threshold": 60.0 }}, "hough": {{ "vote_threshold": 80 }} }}"#
        )?;

        let mut args = args(Some(file.path().to_path_buf()));
        args.angle_step = Some(0.5);

        let config = load_config(&args)?;
        assert_eq!(config.edges.magnitude_threshold, 60.0);
        assert_eq!(config.hough.vote_threshold, 80);
        assert_eq!(config.hough.angle_step_deg, 0.5);

        Ok(())
    }

    #[test]
    fn defaults_without_config() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config(&args(None))?;
        assert_eq!(config.edges.magnitude_threshold, 40.0);
        assert_eq!(config.hough.vote_threshold, 100);
        assert_eq!(config.hough.angle_step_deg, 1.0);

        Ok(())
    }
}
