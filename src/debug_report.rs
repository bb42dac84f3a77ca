use spokenform::{BuildMetrics, NormalizeDetails, Token};

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

pub fn print_run(details: &NormalizeDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Normalizing: \"{}\"", details.text), ansi::CYAN)));
    if details.preprocessed != details.text {
        println!("  {} \"{}\"", palette.dim("preprocessed:"), details.preprocessed);
    }

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    print_tokens(&details.tokens, &palette);

    println!("\n{}", palette.paint("━━━ Spoken ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&details.spoken, ansi::GREEN)));

    println!("\n{}", palette.paint("━━━ Build ━━━", ansi::GRAY));
    print_build(&details.build, &palette);

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Preprocess: {}  │  Classify: {}  │  Verbalize: {}",
        palette.paint(format!("{:?}", details.run.total), ansi::GREEN),
        palette.dim(format!("{:?}", details.run.preprocess)),
        palette.paint(format!("{:?}", details.run.classify), ansi::CYAN),
        palette.dim(format!("{:?}", details.run.verbalize)),
    );
    println!();
}

fn print_tokens(tokens: &[Token], palette: &ansi::Palette) {
    if tokens.is_empty() {
        println!("{}", palette.dim("  No tokens produced"));
        return;
    }
    for (idx, token) in tokens.iter().enumerate() {
        let fields = token
            .fields
            .iter()
            .map(|(name, value)| format!("{}{}", palette.dim(format!("{name}=")), palette.paint(value, ansi::YELLOW)))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            palette.paint(&token.category, ansi::BLUE),
            fields
        );
    }
}

fn print_build(build: &BuildMetrics, palette: &ansi::Palette) {
    let source = if build.restored { palette.paint("restored from archive", ansi::GREEN) } else { "compiled".to_string() };
    println!(
        "  {}  │  Total: {}  │  Sentence graph: {} states, {} arcs",
        source,
        palette.paint(format!("{:?}", build.total), ansi::GREEN),
        build.sentence_states,
        build.sentence_arcs,
    );
    if build.grammars.is_empty() {
        return;
    }
    println!(
        "  {} {}",
        palette.dim("cascade:"),
        palette.dim(format!("{:?}", build.cascade)),
    );
    for grammar in &build.grammars {
        println!(
            "  {:<12} {:<14} {:>6} states {:>7} arcs  worst {:>6.2}  {}",
            palette.paint(grammar.category, ansi::BLUE),
            palette.dim(grammar.priority.name()),
            grammar.states,
            grammar.arcs,
            grammar.worst_case,
            palette.dim(format!("{:?}", grammar.duration)),
        );
    }
    println!(
        "  {} {:.2}",
        palette.dim("worst case total:"),
        build.worst_case_total,
    );
}
