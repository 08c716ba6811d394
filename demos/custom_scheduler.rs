//! Example: Custom Scheduler
//!
//! Any type implementing `Scheduler` can drive subscriptions. This one
//! starts a fresh thread per subscription and logs what it does, then the
//! numbered-words pipeline is drained through it.

use std::thread;

use coldrx::prelude::*;

#[derive(Clone, Copy, Default)]
pub struct NewThreadScheduler;

impl Scheduler for NewThreadScheduler {
  fn schedule<F>(&self, task: F) -> coldrx::Result<()>
  where
    F: FnOnce() + Send + 'static,
  {
    println!("[NewThreadScheduler] starting a thread for a new subscription");
    thread::Builder::new()
      .name("coldrx-new-thread".into())
      .spawn(task)?;
    Ok(())
  }
}

fn main() -> coldrx::Result<()> {
  let words = ["the", "quick", "brown", "fox", "jumped", "over", "the", "lazy", "dog"];

  let lines = observable::from_iter(words)
    .zip_with(observable::range(1, i64::MAX)?, |word, i| {
      let worker = thread::current().name().unwrap_or("unnamed").to_owned();
      format!("{i:2}. {word} (on {worker})")
    })
    .subscribe_on(NewThreadScheduler)
    .blocking_iter()?;

  for line in lines {
    match line {
      Ok(line) => println!("{line}"),
      Err(never) => match never {},
    }
  }
  Ok(())
}
