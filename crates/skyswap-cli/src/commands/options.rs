use clap::Args;
use skyswap_core::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_GUIDED_EPS, DEFAULT_GUIDED_RADIUS,
};
use skyswap_core::filters::guided::GuidedFilterParams;
use skyswap_core::frame::CanvasSize;
use skyswap_core::pipeline::config::CompositeConfig;

/// Canvas and guided filter flags shared by every command that refines a matte.
#[derive(Args, Clone)]
pub struct MatteOptions {
    /// Output canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: usize,

    /// Output canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: usize,

    /// Guided filter window radius
    #[arg(long, default_value_t = DEFAULT_GUIDED_RADIUS)]
    pub radius: usize,

    /// Guided filter regularization
    #[arg(long, default_value_t = DEFAULT_GUIDED_EPS)]
    pub eps: f32,
}

impl MatteOptions {
    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn guided_filter(&self) -> GuidedFilterParams {
        GuidedFilterParams {
            radius: self.radius,
            eps: self.eps,
        }
    }
}

/// Light matching and compositing flags.
#[derive(Args, Clone)]
pub struct CompositeOptions {
    #[command(flatten)]
    pub matte: MatteOptions,

    /// Fraction of the sky color shift applied to the foreground (0-1)
    #[arg(long, default_value = "0.5")]
    pub recolor: f32,

    /// Foreground brightness scale in manual lighting mode (0-1)
    #[arg(long, default_value = "0.8")]
    pub relight: f32,

    /// Skybox zoom before cropping (1.0-1.2)
    #[arg(long, default_value = "1.0")]
    pub center_crop: f32,

    /// Keep the statistical recolor without manual relighting
    #[arg(long)]
    pub auto_light: bool,

    /// Add sky light bleed around the horizon
    #[arg(long)]
    pub halo: bool,
}

impl CompositeOptions {
    pub fn composite(&self) -> CompositeConfig {
        CompositeConfig {
            recoloring_factor: self.recolor,
            relighting_factor: self.relight,
            skybox_center_crop: self.center_crop,
            auto_light_matching: self.auto_light,
            halo_effect: self.halo,
        }
    }
}
