/*!
 * Command Interpreter
 * Evaluates shell commands and forwards admissions to the scheduler
 */

use super::command::{parse_line, Command};
use super::{Origin, Request};
use crate::monitor::Console;
use crate::process::types::ProcessClass;
use crate::sched::ProcessManager;
use flume::Receiver;
use log::info;
use std::io;
use std::sync::Arc;
use std::thread;

/// Duration of the foreground job each interactive line stands for
const INTERACTIVE_DURATION: u32 = 5;

/// Evaluates requests from every admission source
pub struct Interpreter {
    manager: Arc<ProcessManager>,
    console: Arc<Console>,
}

impl Interpreter {
    pub fn new(manager: Arc<ProcessManager>, console: Arc<Console>) -> Self {
        Self { manager, console }
    }

    /// Drain requests until every source hangs up, then seal the manager
    pub fn run(&self, requests: Receiver<Request>) {
        for request in requests.iter() {
            self.handle(&request);
        }
        info!("all admission sources closed");
        self.manager.seal();
    }

    pub fn spawn(self, requests: Receiver<Request>) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("interp".to_string())
            .spawn(move || self.run(requests))
    }

    /// Evaluate one submitted line
    pub fn handle(&self, request: &Request) {
        // every interactive line also admits one foreground job standing for
        // the command the user launched
        if request.origin == Origin::Interactive {
            self.admit(ProcessClass::Foreground, INTERACTIVE_DURATION);
        }
        for parsed in parse_line(&request.line) {
            match parsed {
                Ok(command) => self.eval(command),
                Err(e) => self.console.line(format_args!("{e}")),
            }
        }
    }

    fn eval(&self, command: Command) {
        match command {
            Command::Echo(text) => self.console.line(format_args!("{text}")),
            Command::Gcd(x, y) => {
                self.console
                    .line(format_args!("GCD({}, {}) = {}", x, y, gcd(x, y)));
            }
            Command::Prime(x) => {
                self.console.line(format_args!(
                    "There are {} prime numbers less than or equal to {}",
                    prime_count(x),
                    x
                ));
            }
            Command::Sum(x) => {
                self.console
                    .line(format_args!("The sum of 1 to {} is {}", x, sum_mod(x)));
            }
            Command::Dummy(count) => {
                for _ in 0..count {
                    self.admit(ProcessClass::Background, 1);
                }
            }
            Command::Admit { class, duration } => self.admit(class, duration),
        }
    }

    fn admit(&self, class: ProcessClass, duration: u32) {
        if let Err(e) = self.manager.admit(class, duration) {
            self.console
                .line(format_args!("admission rejected: {e}"));
        }
    }
}

/// Euclid's algorithm
fn gcd(x: u64, y: u64) -> u64 {
    let (mut a, mut b) = (x.max(y), x.min(y));
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Sieve count of primes at or below `x`
fn prime_count(x: u64) -> u64 {
    if x < 2 {
        return 0;
    }
    let bound = x as usize;
    let mut is_prime = vec![true; bound + 1];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2;
    while i * i <= bound {
        if is_prime[i] {
            let mut j = i * i;
            while j <= bound {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    is_prime.iter().filter(|&&p| p).count() as u64
}

/// Sum of 1..=x modulo 1_000_000
fn sum_mod(x: u64) -> u64 {
    let x = x as u128;
    ((x * (x + 1) / 2) % 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 30), 6);
        assert_eq!(gcd(30, 12), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(0, 5), 5);
    }

    #[test]
    fn test_prime_count() {
        assert_eq!(prime_count(0), 0);
        assert_eq!(prime_count(1), 0);
        assert_eq!(prime_count(2), 1);
        assert_eq!(prime_count(10), 4);
        assert_eq!(prime_count(100), 25);
    }

    #[test]
    fn test_sum_mod() {
        assert_eq!(sum_mod(10), 55);
        assert_eq!(sum_mod(2000), 1000); // 2001000 % 1000000
    }
}
