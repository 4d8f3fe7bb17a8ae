/*++

Licensed under the Apache-2.0 license.

File Name:

    boot.rs

Abstract:

    Boot sequencer: wakes the flash, validates the image header, streams the
    program into RAM and always puts the flash back into deep power-down.

--*/

use crate::diag::Diagnostics;
use crate::flash::SpiFlash;
use crate::loader::{ImageLoader, RamRegion};
use crate::spi::SpiTransport;
use krz_config::BootConfig;
use krz_error::BootError;
use krz_romtime::{HardwarePort, PortParts, SysRegs};
use smlang::statemachine;

/// Result of a power-down, handed to the guards that pick the final state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Loaded,
    Failed(BootError),
}

statemachine! {
    derive_states: [Clone, Copy, Debug],
    transitions: {
        *Init + Configured = ReadVector,
        Init + Fault = PowerDown,

        ReadVector + VectorRead = ReadLength,

        // wake + length fetch
        ReadLength + LengthRead = Validate,
        ReadLength + Fault = PowerDown,

        Validate + Accepted = Stream,
        Validate + Fault = PowerDown,

        Stream + Copied = PowerDown,
        Stream + Fault = PowerDown,

        // Every path goes through power-down exactly once.
        PowerDown + PoweredDown(Verdict) [is_loaded] = Jump,
        PowerDown + PoweredDown(Verdict) [is_failed] = Halt,
    }
}

#[derive(Default)]
pub struct Context {
    boot_vector: u32,
    length: u32,
    failure: Option<BootError>,
}

impl StateMachineContext for Context {
    fn is_loaded(&self, verdict: &Verdict) -> Result<bool, ()> {
        Ok(*verdict == Verdict::Loaded)
    }

    fn is_failed(&self, verdict: &Verdict) -> Result<bool, ()> {
        Ok(matches!(verdict, Verdict::Failed(_)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootOutcome {
    /// Program is in RAM; execution continues at the given address.
    Launch(u32),
    /// Nothing runnable was loaded.
    Halt(BootError),
}

pub struct BootSequencer<'a, P: HardwarePort> {
    port: &'a mut P,
    ram: RamRegion<'a>,
    config: BootConfig,
}

impl<'a, P: HardwarePort> BootSequencer<'a, P> {
    pub fn new(port: &'a mut P, ram: RamRegion<'a>, config: BootConfig) -> Self {
        BootSequencer { port, ram, config }
    }

    pub fn run(self) -> BootOutcome {
        let BootSequencer {
            port,
            mut ram,
            config,
        } = self;
        let PortParts {
            sys,
            gpio,
            spi,
            uart,
        } = port.parts();

        let mut diag = Diagnostics::new(uart, &config);
        let mut flash = SpiFlash::new(SpiTransport::new(gpio, spi, &config));

        let mut state_machine = StateMachine::new(Context::default());
        let mut prev_state = *state_machine.state();
        diag.banner();

        loop {
            let state = *state_machine.state();
            if state != prev_state {
                diag.transition(prev_state, state);
                prev_state = state;
            }

            match state {
                States::Init => {
                    flash.transport_mut().init();
                    match config.check() {
                        Ok(()) => {
                            let _ = state_machine.process_event(Events::Configured);
                        }
                        Err(err) => fault(&mut state_machine, err),
                    }
                }
                States::ReadVector => {
                    let boot_vector = match sys.boot_vector() {
                        0 => config.default_boot_vector,
                        vector => vector,
                    };
                    diag.boot_vector(boot_vector);
                    state_machine.context_mut().boot_vector = boot_vector;
                    let _ = state_machine.process_event(Events::VectorRead);
                }
                States::ReadLength => {
                    let boot_vector = state_machine.context().boot_vector;
                    let length = match flash.wake() {
                        Ok(()) => ImageLoader::new(&mut flash, &config).read_length(boot_vector),
                        Err(err) => Err(err),
                    };
                    match length {
                        Ok(length) => {
                            diag.program_size(length);
                            state_machine.context_mut().length = length;
                            let _ = state_machine.process_event(Events::LengthRead);
                        }
                        Err(err) => fault(&mut state_machine, err),
                    }
                }
                States::Validate => {
                    let length = state_machine.context().length;
                    match ImageLoader::new(&mut flash, &config).validate(length) {
                        Ok(()) => {
                            let _ = state_machine.process_event(Events::Accepted);
                        }
                        Err(err) => fault(&mut state_machine, err),
                    }
                }
                States::Stream => {
                    let Context {
                        boot_vector,
                        length,
                        ..
                    } = *state_machine.context();
                    let mut loader = ImageLoader::new(&mut flash, &config);
                    match loader.stream_copy(boot_vector, length, &mut ram, &mut diag) {
                        Ok(()) => {
                            let _ = state_machine.process_event(Events::Copied);
                        }
                        Err(err) => fault(&mut state_machine, err),
                    }
                }
                States::PowerDown => {
                    let verdict = match state_machine.context().failure {
                        None => match flash.power_down() {
                            Ok(()) => Verdict::Loaded,
                            Err(err) => Verdict::Failed(err),
                        },
                        Some(err) => {
                            // Best effort; the first failure is what gets reported.
                            flash.transport_mut().deselect();
                            let _ = flash.power_down();
                            Verdict::Failed(err)
                        }
                    };
                    if let Verdict::Failed(err) = verdict {
                        state_machine.context_mut().failure = Some(err);
                    }
                    let _ = state_machine.process_event(Events::PoweredDown(verdict));
                }
                States::Jump | States::Halt => break,
            }
        }

        match state_machine.context().failure {
            None => {
                diag.launch(ram.base());
                BootOutcome::Launch(ram.base())
            }
            Some(err) => {
                diag.error(err);
                flash.transport_mut().set_error_led(true);
                sys.set_scratch(err.code());
                BootOutcome::Halt(err)
            }
        }
    }
}

fn fault(state_machine: &mut StateMachine<Context>, err: BootError) {
    state_machine.context_mut().failure = Some(err);
    let _ = state_machine.process_event(Events::Fault);
}
