extern crate consheap;

use eyre::WrapErr;
use rustyline::{error::ReadlineError, DefaultEditor};

fn main() -> eyre::Result<()> {
    // warnings only; the repl's `!trace` swaps in its own verbose subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .without_time()
        .init();

    let capacity = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .wrap_err_with(|| format!("heap capacity should be a number, not {:?}", arg))?,
        None => consheap::DEFAULT_CAPACITY,
    };
    let mut heap = cellgc::Heap::new(capacity)?;

    match consheap::self_test() {
        Ok(_) => println!("self-test passed, {} cells at your disposal!", capacity),
        _ => println!(":( self-test failed ): you're on your own, good luck!"),
    }

    let mut rl = DefaultEditor::new()?;

    consheap::repl(&mut heap, |prompt| match rl.readline(prompt) {
        Ok(line) => {
            if let Err(err) = rl.add_history_entry(line.as_str()) {
                tracing::warn!(%err, "could not record history");
            }
            Some(line)
        }
        Err(ReadlineError::Interrupted) => {
            println!("CTRL-C");
            None
        }
        Err(ReadlineError::Eof) => {
            println!("CTRL-D");
            None
        }
        Err(err) => {
            println!("Error: {:?}", err);
            None
        }
    })?;
    Ok(())
}
