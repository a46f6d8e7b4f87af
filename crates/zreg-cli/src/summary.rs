use console::Style;
use zreg_core::depth::DepthState;
use zreg_core::pipeline::config::PipelineConfig;
use zreg_core::pipeline::RegistrationReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    warning: Style,
    failed: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            warning: Style::new().yellow(),
            failed: Style::new().red().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Depth Registration"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Directory"),
        s.path.apply_to(config.target_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Stem"),
        s.value.apply_to(&config.file_stem)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Channels"),
        s.value.apply_to(format!(
            "{} (reference ch{})",
            config.channels, config.reference_channel
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Fast-z"),
        s.value.apply_to(format!(
            "bucket {} of {}, step {} um",
            config.fast_z_slice, config.fast_z_slices, config.fast_z_step
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Alignment"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Correlation"),
        s.method.apply_to(config.alignment.normalization)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Precision"),
        s.value.apply_to(format!("1/{} px", config.alignment.upsample_factor.max(1)))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Resample"),
        s.method.apply_to(config.alignment.resample)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Anchor"),
        s.value.apply_to(format!("{:.0}% of frames", config.anchor_fraction * 100.0))
    );
    println!();
}

pub fn print_report(report: &RegistrationReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Depths"));
    for (depth, file) in report.files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(failure) = report.failures.iter().find(|f| f.depth == depth) {
            println!(
                "    {:>3}  {:<32}{} {}",
                depth,
                name,
                s.failed.apply_to("failed"),
                failure.error
            );
            continue;
        }

        let state = report.propagation.states[depth];
        let shift = report.propagation.shifts[depth]
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".into());
        let offset = report
            .record(depth)
            .map(|r| r.line_offset.to_string())
            .unwrap_or_default();
        let status = match state {
            DepthState::Aligned if depth == report.propagation.anchor => {
                s.method.apply_to("anchor".to_string())
            }
            DepthState::Aligned => s.method.apply_to(format!("shift {shift}")),
            DepthState::Halted => s.warning.apply_to("halted".to_string()),
            DepthState::Unvisited => s.label.apply_to("unvisited".to_string()),
        };
        println!(
            "    {:>3}  {:<32}{}  {}",
            depth,
            name,
            status,
            s.label.apply_to(format!("line offset {offset}"))
        );
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() || !report.propagation.halts.is_empty() {
        println!();
        println!("  {}", s.header.apply_to("Warnings"));
        for warning in warnings {
            println!("    {}", s.warning.apply_to(warning));
        }
        for halt in &report.propagation.halts {
            println!(
                "    {}",
                s.warning
                    .apply_to(format!("chain stopped at depth {}: {}", halt.depth, halt.reason))
            );
        }
    }

    println!();
    println!("  {}", s.header.apply_to("Output"));
    let range = report.aligned_depths();
    println!(
        "    {:<12}{}",
        s.label.apply_to("Depths"),
        s.value.apply_to(format!("{}..{}", range.start, range.end))
    );
    for path in &report.outputs {
        println!("    {}", s.path.apply_to(path.display()));
    }
    println!();
}
