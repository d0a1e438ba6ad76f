//! Relational walkthrough: build a small table in memory, explore it,
//! then generate SQL examples in both modes.
//!
//! Run with: cargo run --example relational_demo

use querytutor::{Mode, RelationalConstruct, Session, Table, Value};

fn main() -> querytutor::Result<()> {
    println!("=== QueryTutor Relational Demo ===\n");

    let mut session = Session::with_seed(42);
    session.register_table(books());

    println!("--- Exploring the dataset ---\n");
    if let Some(summary) = session.explore("books") {
        println!("{}", summary);
    }

    println!("--- Sample mode: one query per supported construct ---");
    for result in session.sample_queries("books") {
        println!("\n{}", result.description);
        println!("Query:  {}", result.query);
        if let Some(output) = &result.output {
            println!("Output: {}", output);
        }
    }

    println!("\n--- Construct mode: ask for one construct by name ---");
    for name in ["group by", "having", "like", "range"] {
        let batch = session.queries_by_construct("books", name)?;
        for result in batch {
            println!("\n[{}]", name);
            println!("{}", result.description);
            println!("Query:  {}", result.query);
        }
    }

    println!("\n--- Every construct, programmatically ---");
    let mut rng = rand::thread_rng();
    for construct in RelationalConstruct::ALL {
        let batch = querytutor::relational::generate(
            session.store(),
            "books",
            Some(construct),
            Mode::Construct,
            &mut rng,
        );
        for result in batch {
            println!("{:>10}: {}", construct.label(), result.query);
        }
    }

    println!("\n=== Demo complete ===");
    Ok(())
}

fn books() -> Table {
    let mut table = Table::new(
        "books",
        vec![
            "title".to_string(),
            "author".to_string(),
            "genre".to_string(),
            "price".to_string(),
            "stock".to_string(),
        ],
    );
    let rows = [
        ("Dune", "Herbert", "scifi", 12.5, 30),
        ("Hyperion", "Simmons", "scifi", 9.0, 12),
        ("Emma", "Austen", "classic", 7.25, 40),
        ("Persuasion", "Austen", "classic", 8.0, 5),
        ("Neuromancer", "Gibson", "scifi", 11.0, 18),
        ("Middlemarch", "Eliot", "classic", 10.5, 9),
    ];
    for (title, author, genre, price, stock) in rows {
        let row = vec![
            Value::Text(title.to_string()),
            Value::Text(author.to_string()),
            Value::Text(genre.to_string()),
            Value::Float(price),
            Value::Integer(stock),
        ];
        if let Err(e) = table.push_row(row) {
            eprintln!("bad demo row: {}", e);
        }
    }
    table
}
