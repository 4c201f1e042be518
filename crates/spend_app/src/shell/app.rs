use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use spend_core::{update, AppState, Employee, Msg, RequestId};
use spend_logging::{spend_debug, spend_info};

use super::config::ShellConfig;
use super::effects::EffectRunner;
use super::input::{parse_command, Command, HELP};
use super::render::{render, render_employee_options};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app(config: ShellConfig) -> anyhow::Result<()> {
    spend_info!("starting shell against {}", config.backend.base_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config.backend, config.engine, msg_tx)?;
    let commands = spawn_input_reader()?;

    let mut shell = Shell {
        state: AppState::new(),
        runner,
        out: io::stdout(),
    };
    shell.print(&format!("{HELP}\n"));
    shell.dispatch_msg(Msg::Mounted);

    loop {
        while let Ok(command) = commands.try_recv() {
            if command == Command::Quit {
                spend_info!("shell exiting");
                return Ok(());
            }
            shell.handle_command(command);
        }
        // Completions are collected before reports are drained. A failure is
        // reported before its completion is sent, so the report goes first.
        let completions = shell.runner.poll();
        while let Ok(msg) = msg_rx.try_recv() {
            shell.dispatch_msg(msg);
        }
        for msg in completions {
            shell.dispatch_msg(msg);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Reads stdin on its own thread; end of input is treated as `quit`.
fn spawn_input_reader() -> io::Result<mpsc::Receiver<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("spend-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if let Some(command) = parse_command(&line) {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(Command::Quit);
        })?;
    Ok(rx)
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    out: io::Stdout,
}

impl Shell {
    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Employees => {
                let text = render_employee_options(&self.state.view().employee_options);
                self.print(&text);
            }
            Command::Select(id) => match self.find_employee(&id) {
                Some(employee) => self.dispatch_msg(Msg::EmployeeSelected(employee)),
                None => self.print(&format!("unknown employee '{id}'\n")),
            },
            Command::All => self.dispatch_msg(Msg::EmployeeSelected(Employee::empty())),
            Command::More => {
                if !self.state.can_load_more() {
                    self.print("nothing more to load right now\n");
                }
                self.dispatch_msg(Msg::LoadMoreClicked);
            }
            Command::Dismiss => self.dispatch_msg(Msg::ErrorDismissed),
            Command::Help => self.print(&format!("{HELP}\n")),
            Command::Unknown(line) => self.print(&format!("unrecognized '{line}'; {HELP}\n")),
            Command::Quit => {}
        }
    }

    fn find_employee(&self, id: &str) -> Option<Employee> {
        self.state
            .directory()
            .data()?
            .iter()
            .find(|employee| employee.id == id)
            .cloned()
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let completion = completion_request(&msg);

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty {
            let text = render(&self.state.view());
            self.print(&text);
        } else if let Some(request) = completion {
            spend_debug!("discarded stale completion for request #{}", request);
        }
    }

    fn print(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

fn completion_request(msg: &Msg) -> Option<RequestId> {
    match msg {
        Msg::EmployeesLoaded { request, .. }
        | Msg::PageLoaded { request, .. }
        | Msg::EmployeeTransactionsLoaded { request, .. } => Some(*request),
        _ => None,
    }
}
