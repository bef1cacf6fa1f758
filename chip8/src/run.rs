use std::thread;

use anyhow::Context;

use crate::{FrameBuffer, Machine, RunOptions, RunState};

/// Control signals surfaced by an input adapter. Nothing else from the
/// platform event queue reaches the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    TogglePause,
    Quit,
}

/// Renders one frame from the machine's framebuffer.
#[cfg_attr(test, mockall::automock)]
pub trait Presenter {
    fn present(&mut self, fb: &FrameBuffer) -> anyhow::Result<()>;
}

/// Drains pending control signals from the platform event queue.
#[cfg_attr(test, mockall::automock)]
pub trait InputSource {
    fn poll(&mut self) -> anyhow::Result<Vec<Signal>>;
}

/// Drive the machine until it quits or faults.
///
/// Each tick polls the input adapter, applies any run-state transitions,
/// executes a fixed instruction budget while running, and then hands the
/// framebuffer to the presenter. While paused no instruction is consumed.
pub fn run<F>(machine: &mut Machine, frontend: &mut F, opts: &RunOptions) -> anyhow::Result<()>
where
    F: Presenter + InputSource,
{
    loop {
        for signal in frontend.poll().context("poll input")? {
            match signal {
                Signal::Quit => machine.request_quit(),
                Signal::TogglePause => machine.toggle_pause(),
            }
        }

        match machine.run_state() {
            RunState::Quit => return Ok(()),
            RunState::Paused => {}
            RunState::Running => {
                for _ in 0..opts.steps_per_frame {
                    machine.step().context("execute instruction")?;
                }
                frontend
                    .present(machine.framebuffer())
                    .context("render frame")?;
            }
        }

        thread::sleep(opts.frame_interval);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockall::Sequence;

    use super::{run, InputSource, MockInputSource, MockPresenter, Presenter, Signal};
    use crate::{FrameBuffer, Machine, RunOptions, RunState, ROM_ADDR};

    /// One adapter implementing both capabilities, like the real frontends.
    struct Harness {
        input: MockInputSource,
        presenter: MockPresenter,
    }

    impl Presenter for Harness {
        fn present(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
            self.presenter.present(fb)
        }
    }

    impl InputSource for Harness {
        fn poll(&mut self) -> anyhow::Result<Vec<Signal>> {
            self.input.poll()
        }
    }

    fn test_opts() -> RunOptions {
        RunOptions {
            steps_per_frame: 3,
            frame_interval: Duration::ZERO,
        }
    }

    #[test]
    fn test_quit_before_first_step() {
        let mut machine = Machine::new();
        let mut frontend = Harness {
            input: MockInputSource::new(),
            presenter: MockPresenter::new(),
        };
        frontend
            .input
            .expect_poll()
            .times(1)
            .returning(|| Ok(vec![Signal::Quit]));
        frontend.presenter.expect_present().never();

        run(&mut machine, &mut frontend, &test_opts()).unwrap();
        assert_eq!(machine.run_state(), RunState::Quit);
        assert_eq!(machine.pc(), ROM_ADDR as u16);
    }

    #[test]
    fn test_step_budget_and_present_per_frame() {
        let mut machine = Machine::new();
        let mut seq = Sequence::new();
        let mut frontend = Harness {
            input: MockInputSource::new(),
            presenter: MockPresenter::new(),
        };
        frontend
            .input
            .expect_poll()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![]));
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::Quit]));
        frontend.presenter.expect_present().times(2).returning(|_| Ok(()));

        run(&mut machine, &mut frontend, &test_opts()).unwrap();
        // two non-paused frames, three instructions each
        assert_eq!(machine.pc(), ROM_ADDR as u16 + 2 * 3 * 2);
    }

    #[test]
    fn test_paused_consumes_no_instructions() {
        let mut machine = Machine::new();
        let mut seq = Sequence::new();
        let mut frontend = Harness {
            input: MockInputSource::new(),
            presenter: MockPresenter::new(),
        };
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::TogglePause]));
        frontend
            .input
            .expect_poll()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![]));
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::Quit]));
        frontend.presenter.expect_present().never();

        run(&mut machine, &mut frontend, &test_opts()).unwrap();
        assert_eq!(machine.pc(), ROM_ADDR as u16);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut machine = Machine::new();
        let mut seq = Sequence::new();
        let mut frontend = Harness {
            input: MockInputSource::new(),
            presenter: MockPresenter::new(),
        };
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::TogglePause]));
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::TogglePause]));
        frontend
            .input
            .expect_poll()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Signal::Quit]));
        frontend.presenter.expect_present().times(1).returning(|_| Ok(()));

        run(&mut machine, &mut frontend, &test_opts()).unwrap();
        // exactly one running frame between pause and quit
        assert_eq!(machine.pc(), ROM_ADDR as u16 + 2 * 3);
    }
}
