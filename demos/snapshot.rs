use std::collections::BTreeMap;

use structview::*;

#[derive(Explore)]
struct Library {
    name: String,
    shelves: BTreeMap<String, Shelf>,
    closed: Option<String>,
}

#[derive(Explore)]
struct Shelf {
    books: Vec<Book>,
}

#[derive(Explore)]
struct Book {
    title: String,
    year: u16,
    lent_to: Option<String>,
}

fn book(title: &str, year: u16) -> Book {
    Book {
        title: title.into(),
        year,
        lent_to: None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut shelves = BTreeMap::new();
    shelves.insert(
        "fiction".to_string(),
        Shelf {
            books: vec![book("Solaris", 1961), book("Dune", 1965)],
        },
    );
    shelves.insert("poetry".to_string(), Shelf { books: vec![] });

    let explorer = Explorer::default().with_root(
        "library",
        Library {
            name: "Central".into(),
            shelves,
            closed: None,
        },
    )?;

    // Walk down to the books of the fiction shelf, one column at a time.
    explorer.apply_json(r#"{"row":0,"column":0,"selections":["shelves","name"],"action":"right"}"#)?;
    explorer.apply(&Instruction::new(0, 1, Action::Right).with_selections(["fiction", "poetry"]))?;
    explorer.apply(&Instruction::new(0, 2, Action::Right).with_selections(["books"]))?;
    explorer.apply(&Instruction::new(0, 3, Action::Down).with_selections(["0", "1"]))?;
    explorer.apply(&Instruction::new(1, 3, Action::ToggleNils))?;

    println!("{}", explorer.snapshot().to_json_pretty()?);
    Ok(())
}
