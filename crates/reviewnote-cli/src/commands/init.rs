//! The `reviewnote init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("reviewnote.toml").exists() {
        println!("reviewnote.toml already exists, skipping.");
    } else {
        std::fs::write("reviewnote.toml", SAMPLE_CONFIG)?;
        println!("Created reviewnote.toml");
    }

    let example_path = std::path::Path::new("roster-example.csv");
    if example_path.exists() {
        println!("roster-example.csv already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ROSTER)?;
        println!("Created roster-example.csv");
    }

    println!("\nNext steps:");
    println!("  1. Edit reviewnote.toml with your exam title and question counts");
    println!("  2. Run: reviewnote validate --roster roster-example.csv");
    println!("  3. Run: reviewnote stats --roster roster-example.csv --format all");
    println!("  4. Run: reviewnote notes --roster roster-example.csv --assets questions.zip");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# reviewnote configuration

# Used in note file names (<name>_<title>) and report headings.
title = "25 S2 SAT MATH Mock Test1"

[questions]
module1 = 22
module2 = 22

[policy]
# both-attempted | both-present | any-missed
eligibility = "both-attempted"
# all-correct | reject
empty_list = "all-correct"

[report]
emphasis_threshold = 30.0
decimals = 1

[document]
font_size_pt = 10.0
margin_top_mm = 30.0
margin_side_mm = 25.4
margin_bottom_mm = 25.4
image_width_pct = 100
show_empty_sections = true
list_missing_images = false

# Extra header spellings, on top of the built-in ones.
[columns]
name = []
module1 = []
module2 = []
"#;

// Blank cell: did not sit the module. X: sat it and missed nothing.
const EXAMPLE_ROSTER: &str = "이름,Module1,Module2\n홍길동,\"1,3,5\",\"2,6\"\n김철수,X,\"1,3\"\n이영희,,X\n";
