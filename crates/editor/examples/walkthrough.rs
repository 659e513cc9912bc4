use clip_canvas::{ImageSize, available_positions, headroom};
use editor::{
    DialogueDocument, DialogueLine, EditSession, ImageFile, ImagePatch, SingleDialogue, Speaker,
};

#[derive(clap::Parser)]
#[command(name = "walkthrough", about = "Drive an edit session from the terminal")]
struct Args {
    /// Transcript JSON (`{ "dialogue": … }`) to edit; a built-in sample is
    /// used when omitted.
    #[arg(short, long)]
    transcript: Option<std::path::PathBuf>,

    /// Transcript id reported to validation.
    #[arg(long, default_value = "local-demo")]
    id: String,
}

fn sample() -> DialogueDocument {
    let captions = [
        (Speaker::Peter, "Stewie, you ever heard of compound interest?"),
        (Speaker::Stewie, "I literally run a hedge fund from my crib."),
        (Speaker::Peter, "It's when money has babies."),
        (Speaker::Stewie, "That is the worst explanation I have ever heard."),
    ];
    let dialogue = captions
        .into_iter()
        .enumerate()
        .map(|(i, (speaker, caption))| {
            let mut line = DialogueLine::new(speaker, caption);
            line.line_number = Some(i as u32 + 1);
            line.duration_estimate = Some(3.5);
            line
        })
        .collect();
    DialogueDocument::new(SingleDialogue { title: "Compound Interest".into(), dialogue })
}

fn placeholder_png(name: &str) -> ImageFile {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend(std::iter::repeat_n(0u8, 512));
    ImageFile::new(name, bytes).with_mime("image/png")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    use clap::Parser;
    let args = Args::parse();
    let document = match &args.transcript {
        Some(path) => DialogueDocument::from_json(&std::fs::read_to_string(path)?)?,
        None => sample(),
    };

    let mut session = EditSession::new(args.id, document);
    println!(
        "editing \"{}\" ({} lines)\n",
        session.document().dialogue.title,
        session.line_count()
    );

    let size = ImageSize::Medium;
    let open = available_positions(&session.document().lines()[0].placements(), size);
    println!("line 1 open {size} slots: {open:?}");
    let Some(&position) = open.first() else {
        println!("line 1 has no room for a {size} image, stopping");
        return Ok(());
    };

    let stored = session
        .add_image(0, placeholder_png("chart.png"), size, position)
        .ok_or("add_image refused the placeholder upload")?;
    println!("attached {stored} at {position} ({})", size.label_at(Some(position)));
    if let Some(uri) = session.preview_uri(&stored) {
        println!("preview at {uri}");
    }

    session.update_image(0, 0, ImagePatch::start_time(0.5));
    session.span_image(0, 0, 2);
    println!(
        "spanned {stored} through line 3 (~{:.1}s of narration)",
        session.span_duration(0, 2)
    );

    let placements = session.document().lines()[0].placements();
    println!("line 1 headroom after the add: {:?}", headroom(&placements).allowed_sizes);

    let report = session.validate();
    println!("\nvalidation: {}", if report.valid { "ok" } else { "blocked" });
    for error in &report.errors {
        println!("  error: {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if !session.missing_files().is_empty() {
        println!("  still missing uploads: {:?}", session.missing_files());
    }

    println!("\nsubmission payload:\n{}", session.transcript_json()?);
    Ok(())
}
