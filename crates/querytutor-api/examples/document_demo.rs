//! Document walkthrough: build a small collection in memory, explore
//! it, then generate MongoDB-style examples in both modes.
//!
//! Run with: cargo run --example document_demo

use querytutor::{Collection, DocumentConstruct, Mode, Session};
use serde_json::json;

fn main() -> querytutor::Result<()> {
    println!("=== QueryTutor Document Demo ===\n");

    let mut session = Session::with_seed(7);
    session.register_collection(phones());

    println!("--- Exploring the dataset ---\n");
    if let Some(summary) = session.explore("phones") {
        println!("{}", summary);
    }

    println!("--- Sample mode: one query per supported construct ---");
    for result in session.sample_queries("phones") {
        println!("\n{}", result.description);
        println!("Query:  {}", result.query);
        if let Some(output) = &result.output {
            println!("Output: {}", output);
        }
    }

    println!("\n--- Construct mode: ask for one construct by name ---");
    for name in ["group", "sort", "match", "projection"] {
        let batch = session.queries_by_construct("phones", name)?;
        for result in batch {
            println!("\n[{}]", name);
            println!("{}", result.description);
            println!("Query:  {}", result.query);
        }
    }

    println!("\n--- Every construct, programmatically ---");
    let mut rng = rand::thread_rng();
    for construct in DocumentConstruct::ALL {
        let batch = querytutor::document::generate(
            session.store(),
            "phones",
            Some(construct),
            Mode::Construct,
            &mut rng,
        );
        for result in batch {
            println!("{:>12}: {}", construct.label(), result.query);
        }
    }

    println!("\n=== Demo complete ===");
    Ok(())
}

fn phones() -> Collection {
    let docs = vec![
        json!({ "brand": "Nokia", "model": "G42", "price": 199, "ram": 6, "rating": 4.1 }),
        json!({ "brand": "Sony", "model": "Xperia 10", "price": 349, "ram": 8, "rating": 4.4 }),
        json!({ "brand": "Nokia", "model": "X30", "price": 420, "ram": 8, "rating": 4.2 }),
        json!({ "brand": "Moto", "model": "Edge 40", "price": 499, "ram": 12, "rating": 4.5 }),
        json!({ "brand": "Sony", "model": "Xperia 5", "price": 899, "ram": 8, "rating": 4.6 }),
    ];
    Collection::new("phones", docs)
}
