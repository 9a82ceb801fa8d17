use std::thread;

use lazy_attrs::{singleton, SingletonType};

#[derive(Debug)]
struct AppConfig {
   environment: String,
   workers: usize,
}

singleton!(AppConfig => {
   println!("Loading configuration...");
   AppConfig {
      environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
      workers: thread::available_parallelism().map_or(1, |n| n.get()),
   }
});

fn main() {
   let threads: Vec<_> = (0..4)
      .map(|i| {
         thread::spawn(move || {
            let config = AppConfig::instance();
            println!("thread {i} sees {config:?}");
            config as *const AppConfig as usize
         })
      })
      .collect();

   let addresses: Vec<_> = threads.into_iter().map(|t| t.join().unwrap()).collect();
   assert!(addresses.iter().all(|a| *a == addresses[0]));
   println!("{} workers in {}", AppConfig::instance().workers, AppConfig::instance().environment);
}
