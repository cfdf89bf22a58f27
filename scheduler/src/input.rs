use crate::scheduler::{ConfigError, Pid, Policy, Process, ProcessSet, Ticks};
use log::{debug, warn};
use std::{
    collections::HashSet,
    fmt, fs,
    io::{self, BufRead, Write},
    num::NonZeroU64,
    path::Path,
    str::FromStr,
};

/// Errors from reading a process set.
#[derive(Debug)]
pub enum InputError {
    /// The source could not be read.
    Io { origin: String, source: io::Error },
    /// A CSV record is malformed.
    Format { line: usize, reason: String },
    /// The records are well formed but do not make a valid run.
    Config(ConfigError),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io { origin, source } => write!(f, "failed to read {origin}: {source}"),
            InputError::Format { line, reason } => write!(f, "line {line}: {reason}"),
            InputError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io { source, .. } => Some(source),
            InputError::Config(e) => Some(e),
            InputError::Format { .. } => None,
        }
    }
}

impl From<ConfigError> for InputError {
    fn from(e: ConfigError) -> Self {
        InputError::Config(e)
    }
}

/// Parses a Round Robin quantum, rejecting anything but a positive integer.
pub fn parse_quantum(value: &str) -> Result<NonZeroU64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| ConfigError::InvalidQuantum(value.trim().to_owned()))
}

pub fn read_csv(path: &Path) -> Result<ProcessSet, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        origin: path.display().to_string(),
        source,
    })?;
    parse_csv(&text)
}

/// Parses `pid,arrival,burst,priority` records; the pid column may be
/// omitted, in which case pids count up from 1. A first non-blank line
/// containing letters is taken as a header. Blank lines are ignored.
pub fn parse_csv(text: &str) -> Result<ProcessSet, InputError> {
    let mut processes = Vec::new();
    let mut pids = HashSet::new();
    let mut header_allowed = true;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let record = line.trim();
        if record.is_empty() {
            continue;
        }
        if std::mem::take(&mut header_allowed) && record.chars().any(char::is_alphabetic) {
            debug!("skipping CSV header {record:?}");
            continue;
        }

        let process = parse_record(record, processes.len() as Pid + 1)
            .map_err(|reason| InputError::Format {
                line: line_number,
                reason,
            })?;
        if !pids.insert(process.pid()) {
            return Err(InputError::Format {
                line: line_number,
                reason: format!("duplicate pid {}", process.pid()),
            });
        }
        processes.push(process);
    }

    Ok(ProcessSet::new(processes)?)
}

fn parse_record(record: &str, next_pid: Pid) -> Result<Process, String> {
    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    let (pid, rest) = match fields.len() {
        3 => (next_pid, &fields[..]),
        4 => (parse_field::<Pid>("pid", fields[0])?, &fields[1..]),
        n => return Err(format!("expected 3 or 4 columns (pid optional), found {n}")),
    };
    if pid == 0 {
        return Err("pid must be a positive integer".to_owned());
    }

    let arrival = parse_field::<Ticks>("arrival", rest[0])?;
    let burst = parse_field::<Ticks>("burst", rest[1])?;
    if burst == 0 {
        return Err("burst must be a positive integer".to_owned());
    }
    let priority = parse_field::<i32>("priority", rest[2])?;

    Ok(Process::with_priority(pid, arrival, burst, priority))
}

fn parse_field<T: FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {name} {value:?}"))
}

/// Interactive console input: asks again until an answer is valid.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn io_error(source: io::Error) -> InputError {
        InputError::Io {
            origin: "console".to_owned(),
            source,
        }
    }

    fn say(&mut self, text: &str) -> Result<(), InputError> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(Self::io_error)
    }

    fn read_line(&mut self) -> Result<String, InputError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(Self::io_error)?;
        if read == 0 {
            return Err(Self::io_error(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended",
            )));
        }
        Ok(line.trim().to_owned())
    }

    fn ask<T, F>(&mut self, prompt: &str, parse: F) -> Result<T, InputError>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            self.say(prompt)?;
            let answer = self.read_line()?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => self.say(&format!("{message}\n"))?,
            }
        }
    }

    pub fn read_processes(&mut self) -> Result<ProcessSet, InputError> {
        let count = self.ask("Enter number of processes: ", |answer| {
            match answer.parse::<i64>() {
                Ok(count) if count > 0 => {
                    Pid::try_from(count).map_err(|_| format!("At most {} processes.", Pid::MAX))
                }
                Ok(count) => Err(ConfigError::InvalidProcessCount(count).to_string()),
                Err(_) => Err("Invalid input. Enter a positive integer.".to_owned()),
            }
        })?;

        let mut processes = Vec::new();
        for pid in 1..=count {
            self.say(&format!("=== Process {pid} ===\n"))?;
            let arrival = self.ask("Arrival time: ", |answer| {
                parse_field::<Ticks>("arrival time", answer)
            })?;
            let burst = self.ask("Burst time  : ", |answer| {
                match parse_field::<Ticks>("burst time", answer)? {
                    0 => Err("Burst time must be positive.".to_owned()),
                    burst => Ok(burst),
                }
            })?;
            let priority =
                self.ask("Priority    : ", |answer| parse_field::<i32>("priority", answer))?;
            processes.push(Process::with_priority(pid, arrival, burst, priority));
        }

        Ok(ProcessSet::new(processes)?)
    }

    pub fn read_selection(&mut self) -> Result<Vec<Policy>, InputError> {
        self.say(
            "\nSelect algorithms to run (e.g., 1 2 3 4) or 0 for all:\n\
             1: FCFS\n2: SRTF (preemptive SJF)\n3: Preemptive Priority\n4: Round Robin\nChoice: ",
        )?;
        let answer = self.read_line()?;
        Ok(select_policies(&answer))
    }

    pub fn read_quantum(&mut self) -> Result<NonZeroU64, InputError> {
        self.ask(
            "Enter time quantum for Round Robin (positive integer): ",
            |answer| parse_quantum(answer).map_err(|e| e.to_string()),
        )
    }
}

/// Resolves a selection string, warning about identifiers it skips.
pub fn select_policies(selection: &str) -> Vec<Policy> {
    let (policies, unknown) = Policy::parse_selection(selection);
    for choice in unknown {
        warn!("Unknown choice: {choice}");
    }
    policies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_csv_with_and_without_pids() {
        let set = parse_csv("pid,arrival,burst,priority\n7,0,5,2\n\n 3 , 4 , 1 , 0 \n").unwrap();
        let pids: Vec<Pid> = set.processes().iter().map(Process::pid).collect();
        assert_eq!(pids, vec![3, 7]);

        let set = parse_csv("0,8,1\n1,4,2\n").unwrap();
        let second = &set.processes()[1];
        assert_eq!(second.pid(), 2);
        assert_eq!(second.arrival(), 1);
        assert_eq!(second.burst(), 4);
        assert_eq!(second.priority(), 2);
    }

    #[test]
    fn test_csv_header_after_blank_lines() {
        let set = parse_csv("\n  \npid,arrival,burst,priority\n1,0,2,0\n").unwrap();
        assert_eq!(set.len(), 1);

        let err = parse_csv("1,0,2,0\npid,arrival,burst,priority\n").unwrap_err();
        assert!(matches!(err, InputError::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_csv_wrong_column_count() {
        let err = parse_csv("1,0,5,2\n1,2\n").unwrap_err();
        assert!(matches!(err, InputError::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_csv_rejects_bad_values() {
        for text in ["1,-1,5,0", "1,0,0,0", "1,0,2.5,0", "0,0,1,0"] {
            assert!(
                matches!(parse_csv(text), Err(InputError::Format { line: 1, .. })),
                "{text} was accepted"
            );
        }
    }

    #[test]
    fn test_csv_duplicate_pid() {
        let err = parse_csv("2,0,1,0\n2,1,1,0\n").unwrap_err();
        assert!(matches!(err, InputError::Format { line: 2, .. }));
    }

    #[test]
    fn test_csv_without_records() {
        let err = parse_csv("pid,arrival,burst,priority\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::Config(ConfigError::InvalidProcessCount(0))
        ));
    }

    #[test]
    fn test_read_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,0,8,1").unwrap();
        writeln!(file, "2,1,4,0").unwrap();

        let set = read_csv(file.path()).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn test_parse_quantum() {
        assert_eq!(parse_quantum(" 3 ").unwrap().get(), 3);
        for value in ["0", "-2", "two", ""] {
            assert!(matches!(
                parse_quantum(value),
                Err(ConfigError::InvalidQuantum(_))
            ));
        }
    }

    #[test]
    fn test_console_reprompts_until_valid() {
        let mut prompter = prompter("0\nabc\n2\n0\n8\n1\n1\n-4\n0\n4\n0\n");
        let set = prompter.read_processes().unwrap();

        assert_eq!(set.len(), 2);
        let second = &set.processes()[1];
        assert_eq!((second.arrival(), second.burst()), (1, 4));

        let transcript = String::from_utf8(prompter.output).unwrap();
        assert_eq!(transcript.matches("Enter number of processes: ").count(), 3);
        assert_eq!(transcript.matches("Burst time  : ").count(), 4);
    }

    #[test]
    fn test_console_rejects_oversized_count() {
        let mut prompter = prompter("1000000000000000000\n1\n0\n3\n0\n");
        let set = prompter.read_processes().unwrap();
        assert_eq!(set.len(), 1);

        let transcript = String::from_utf8(prompter.output).unwrap();
        assert_eq!(transcript.matches("Enter number of processes: ").count(), 2);
        assert!(transcript.contains("At most 4294967295 processes."));
    }

    #[test]
    fn test_console_eof_is_io_error() {
        let err = prompter("1\n0\n").read_processes().unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }

    #[test]
    fn test_quantum_prompt_rejects_non_positive() {
        let mut prompter = prompter("0\n-1\n3\n");
        assert_eq!(prompter.read_quantum().unwrap().get(), 3);
    }

    #[test]
    fn test_selection_prompt() {
        assert_eq!(
            prompter("2 4 x\n").read_selection().unwrap(),
            vec![Policy::Srtf, Policy::RoundRobin]
        );
        assert_eq!(prompter("\n").read_selection().unwrap(), Policy::ALL.to_vec());
    }
}
