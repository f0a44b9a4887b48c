use mekorot::{ContextPart, PartRef, RawRef, Ref, Resolution, ResolvedRef, RunResult};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(raw_ref: &RawRef, context_ref: Option<&Ref>, run: &RunResult, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Resolving: \"{}\"", raw_ref.text()), ansi::CYAN)));
    if let Some(context) = context_ref {
        println!("   {} {}", palette.dim("context:"), palette.paint(context.normal(), ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Parts ━━━", ansi::GRAY));
    for (idx, part) in raw_ref.parts().iter().enumerate() {
        let (start, end) = part.span().char_indices();
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.paint(format!("{:?}", part.part_type()), ansi::BLUE),
            palette.bold(part.text()),
            palette.paint(format!("span {start}..{end}"), ansi::YELLOW),
        );
    }

    println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
    if run.candidates.is_empty() {
        println!("{}", palette.dim("  No candidate readings"));
    }
    for candidate in run.candidates.iter().take(20) {
        println!("  {}", fmt_reading(candidate, &palette));
    }
    if run.candidates.len() > 20 {
        println!("  {}", palette.dim(format!("... +{} more", run.candidates.len() - 20)));
    }

    println!("\n{}", palette.paint("━━━ Results ━━━", ansi::GRAY));
    if run.resolutions.is_empty() {
        println!("{}", palette.dim("  No resolution"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No title in the mention matched a term or index title");
        println!("  • A number did not fit the level it was applied to");
        println!("  • No context ref was given for a mention without a title");
        println!("\n{}", palette.dim("  Tip: Set MEKOROT_DEBUG=1 to see match and refinement traces"));
    }
    for (idx, resolution) in run.resolutions.iter().enumerate() {
        let label = match resolution {
            Resolution::Resolved(_) => palette.paint("resolved", ansi::GREEN),
            Resolution::Ambiguous(_) => palette.paint("ambiguous", ansi::YELLOW),
        };
        println!("  {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), label);
        for reading in resolution.readings() {
            println!("      {}", fmt_reading(reading, &palette));
        }
    }

    let m = &run.metrics;
    println!("\n{}", palette.paint("━━━ Metrics ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Seeds: {}  │  Steps: {}  │  Candidates: {}  │  Pruned: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(m.unrefined.to_string(), ansi::CYAN),
        palette.paint(m.refinement_steps.to_string(), ansi::CYAN),
        palette.paint(m.candidates.to_string(), ansi::CYAN),
        palette.dim(m.pruned.to_string()),
    );
    if m.budget_exhausted {
        println!("  {}", palette.paint("refinement budget exhausted; results are partial", ansi::YELLOW));
    }
    println!();
}

fn fmt_reading(reading: &ResolvedRef, palette: &ansi::Palette) -> String {
    let parts: Vec<String> = reading
        .resolved_parts
        .iter()
        .map(|p| match *p {
            PartRef::Whole(i) => i.to_string(),
            PartRef::Words { part, start, end } => format!("{part}[{start}..{end}]"),
        })
        .collect();
    let context: Vec<String> = reading
        .context_parts
        .iter()
        .map(|c| match c {
            ContextPart::Term(slug) => format!("term:{slug}"),
            ContextPart::Section { level, section } => format!("section:{level}={section}"),
        })
        .collect();

    let mut out = format!(
        "{} {} {}",
        palette.bold(palette.paint(reading.reference.normal(), ansi::GREEN)),
        palette.dim("│ parts:"),
        palette.paint(parts.join(","), ansi::YELLOW),
    );
    if !context.is_empty() {
        out.push_str(&format!(" {} {}", palette.dim("│ context:"), palette.paint(context.join(","), ansi::BLUE)));
    }
    if let Some(kind) = reading.context_type {
        out.push_str(&format!(" {}", palette.dim(format!("({kind:?})"))));
    }
    out
}
