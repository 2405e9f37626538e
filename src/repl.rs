use cellgc::{Cell, Heap};
use joinery::JoinableIterator;
use tracing_subscriber::layer::SubscriberExt;

use crate::command::Command;
use crate::*;

/// Run one parsed command against `heap`, returning what to show the user.
pub fn exec(heap: &mut Heap, cmd: Command) -> Result<String, ShellError> {
    use Command::*;
    Ok(match cmd {
        Alloc(root) => {
            let before = heap.collections();
            let address = heap.allocate(root)?;
            if heap.collections() > before {
                format!("{} (after collecting, {} free)", address, heap.free_count())
            } else {
                address.to_string()
            }
        }
        Get(address) => heap.read(address)?.to_string(),
        Set(address, first, second) => {
            heap.write(address, Cell::new(first, second))?;
            heap.read(address)?.to_string()
        }
        First(address, value) => {
            heap.set_first(address, value)?;
            heap.read(address)?.to_string()
        }
        Second(address, value) => {
            heap.set_second(address, value)?;
            heap.read(address)?.to_string()
        }
        Collect(root) => heap.collect(root)?.to_string(),
        Mark(root) => {
            let reachable = heap.mark(root)?;
            format!(
                "{{{}}}",
                reachable.in_visit_order().iter().join_with(" ")
            )
        }
        Print(root) => print::render(heap, root)?,
    })
}

pub fn repl<R>(heap: &mut Heap, mut readline: R) -> Result<(), ShellError>
where
    R: FnMut(&str) -> Option<String>,
{
    let filter = tracing_subscriber::EnvFilter::new("consheap=trace,cellgc=trace")
        // Set the base level when not matched by other directives to WARN.
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());

    let sub = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .finish()
        .with(tracing_error::ErrorLayer::default());

    let tracer = tracing::Dispatch::new(sub);
    let empty_tracer = tracing::Dispatch::none();

    let mut to_trace_with = &empty_tracer;
    let mut trace = false;

    loop {
        let s = match readline("<- ") {
            Some(s) => s,
            None => return Ok(()),
        };

        // repl control mode.
        match s.trim() {
            "" => continue,
            "!trace" => {
                trace = !trace;
                println!(
                    "trace is now {}",
                    if trace {
                        to_trace_with = &tracer;
                        "on"
                    } else {
                        to_trace_with = &empty_tracer;
                        "off"
                    }
                );
                continue;
            }
            "!dump" => {
                print!("{}", print::dump(heap));
                continue;
            }
            "!json" => {
                println!("{}", serde_json::to_string_pretty(&heap.snapshot())?);
                continue;
            }
            "!selftest" => {
                match crate::self_test() {
                    Ok(_) => println!("self-test passed"),
                    Err(report) => println!("{:?}", report),
                }
                continue;
            }
            "quit" => break,
            _ => {}
        }

        let res = tracing::dispatcher::with_default(to_trace_with, || {
            command::cmd(&s)
                .map_err(ShellError::from)
                .and_then(|cmd| exec(heap, cmd))
        });

        match res {
            Ok(res) => println!("=> {}", res),
            Err(ShellError::Heap(e)) if trace => {
                eprintln!("error: {}\n{}", e, e.span_trace())
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}
