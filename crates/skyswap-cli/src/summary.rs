use console::Style;
use skyswap_core::pipeline::config::{CompositeConfig, PipelineConfig};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    enabled: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            enabled: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Sky Replacement"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    for (label, path) in [
        ("Source", &config.source),
        ("Sky", &config.sky),
        ("Mask", &config.mask),
        ("Output", &config.output),
    ] {
        println!(
            "  {:<14}{}",
            s.label.apply_to(label),
            s.path.apply_to(path.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Canvas"),
        s.value
            .apply_to(format!("{}x{}", config.canvas.width, config.canvas.height))
    );
    println!();

    println!("  {}", s.header.apply_to("Matte"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(config.guided_filter.radius)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Eps"),
        s.value.apply_to(config.guided_filter.eps)
    );
    println!();

    print_composite_section(&s, &config.composite);
}

fn print_composite_section(s: &Styles, composite: &CompositeConfig) {
    println!("  {}", s.header.apply_to("Light Matching"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Recolor"),
        s.value.apply_to(format!("{:.2}", composite.recoloring_factor))
    );
    if composite.auto_light_matching {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Relight"),
            s.enabled.apply_to("automatic")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Relight"),
            s.value.apply_to(format!("{:.2}", composite.relighting_factor))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Compositing"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(format!("{:.2}", composite.skybox_center_crop))
    );
    let halo = if composite.halo_effect {
        s.enabled.apply_to("on")
    } else {
        s.disabled.apply_to("off")
    };
    println!("    {:<12}{}", s.label.apply_to("Halo"), halo);
    println!();
}
