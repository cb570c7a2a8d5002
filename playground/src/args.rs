use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct ArgsPlayground {
    /// PNG drawn on the square, a checkerboard is used when omitted
    #[arg(short, long)]
    pub image: Option<PathBuf>,
    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,
    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,
    /// Strength of the RGB split effect on the square, 0 disables it
    #[arg(short, long, default_value_t = 0.0)]
    pub glitch: f32,
    /// Log filter in env_logger syntax, overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = ArgsPlayground::try_parse_from(["fbo-playground"]).unwrap();

        assert_eq!(args.image, None);
        assert_eq!((args.width, args.height), (1280, 720));
        assert_eq!(args.glitch, 0.0);
        assert_eq!(args.log, None);
    }

    #[test]
    fn overrides() {
        let args = ArgsPlayground::try_parse_from([
            "fbo-playground",
            "--image",
            "logo.png",
            "--width",
            "640",
            "--height",
            "480",
            "-g",
            "0.02",
            "--log",
            "gl_wrapper=debug",
        ])
        .unwrap();

        assert_eq!(args.image, Some(PathBuf::from("logo.png")));
        assert_eq!((args.width, args.height), (640, 480));
        assert_eq!(args.glitch, 0.02);
        assert_eq!(args.log.as_deref(), Some("gl_wrapper=debug"));
    }
}
