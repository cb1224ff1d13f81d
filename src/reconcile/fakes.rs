//! Scripted peripherals for pipeline tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use jiff::Timestamp;

use crate::model::{Coordinate, Fix, FixSource, SensorSnapshot};
use crate::peripherals::{
    BoxFuture, DeviceLocator, Notifier, OperatorPrompt, Peripherals, SensorFeed,
};

#[derive(Default)]
pub struct ScriptedSensors {
    snapshot: RefCell<Option<SensorSnapshot>>,
}

impl SensorFeed for ScriptedSensors {
    fn snapshot(&self) -> Option<SensorSnapshot> {
        self.snapshot.borrow().clone()
    }
}

#[derive(Default)]
pub struct ScriptedLocator {
    fixes: RefCell<VecDeque<Option<Fix>>>,
    requests: Cell<usize>,
    hang: Cell<bool>,
}

impl ScriptedLocator {
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl DeviceLocator for ScriptedLocator {
    fn request_fix(&self) -> BoxFuture<'_, Option<Fix>> {
        self.requests.set(self.requests.get() + 1);
        if self.hang.get() {
            return Box::pin(std::future::pending());
        }
        let fix = self.fixes.borrow_mut().pop_front().flatten();
        Box::pin(async move { fix })
    }
}

#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Option<String>>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn ask<'a>(&'a self, message: &'a str) -> BoxFuture<'a, Option<String>> {
        self.asked.borrow_mut().push(message.to_string());
        let answer = self.answers.borrow_mut().pop_front().flatten();
        Box::pin(async move { answer })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// One of each scripted peripheral.
#[derive(Default)]
pub struct Rig {
    pub sensors: ScriptedSensors,
    pub locator: ScriptedLocator,
    pub prompt: ScriptedPrompt,
    pub notifier: RecordingNotifier,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor(self, snapshot: SensorSnapshot) -> Self {
        *self.sensors.snapshot.borrow_mut() = Some(snapshot);
        self
    }

    /// Device fixes stamped with the wall clock.
    pub fn with_fixes(self, fixes: impl IntoIterator<Item = Option<Coordinate>>) -> Self {
        self.locator.fixes.borrow_mut().extend(
            fixes
                .into_iter()
                .map(|c| c.map(|c| Fix::new(Timestamp::now(), c, FixSource::Device))),
        );
        self
    }

    /// Device fixes with explicit timestamps.
    pub fn with_timed_fixes(self, fixes: impl IntoIterator<Item = Fix>) -> Self {
        self.locator
            .fixes
            .borrow_mut()
            .extend(fixes.into_iter().map(Some));
        self
    }

    pub fn with_hanging_locator(self) -> Self {
        self.locator.hang.set(true);
        self
    }

    pub fn with_answers(self, answers: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        self.prompt
            .answers
            .borrow_mut()
            .extend(answers.into_iter().map(|a| a.map(str::to_string)));
        self
    }

    pub fn peripherals(&self) -> Peripherals<'_> {
        Peripherals {
            sensors: &self.sensors,
            locator: &self.locator,
            prompt: &self.prompt,
            notifier: &self.notifier,
        }
    }
}
