use std::collections::{HashMap, HashSet};

use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
	MoveForward, MoveBackward, TurnLeft, TurnRight, Quit
}

impl Command {
	/// Commands that repeat while their key is held.
	pub const REPEATING: [Command; 4] = [
		Command::MoveForward, Command::MoveBackward, Command::TurnLeft, Command::TurnRight
	];
}

pub struct InputState {
	command_binding: HashMap<Command, HashSet<KeyCode>>,
	key_state: HashMap<KeyCode, u32>
}

impl InputState {
	const JUST: u32		= 0b01;
	const PRESSED: u32	= 0b10;
}

impl Default for InputState {
	fn default() -> Self {
		let mut input_state = Self { command_binding: HashMap::new(), key_state: HashMap::new() };

		input_state.bind(Command::MoveForward, KeyCode::KeyW);
		input_state.bind(Command::MoveForward, KeyCode::ArrowUp);
		input_state.bind(Command::MoveBackward, KeyCode::KeyS);
		input_state.bind(Command::MoveBackward, KeyCode::ArrowDown);
		input_state.bind(Command::TurnLeft, KeyCode::KeyA);
		input_state.bind(Command::TurnLeft, KeyCode::ArrowLeft);
		input_state.bind(Command::TurnRight, KeyCode::KeyD);
		input_state.bind(Command::TurnRight, KeyCode::ArrowRight);
		input_state.bind(Command::Quit, KeyCode::Escape);

		input_state
	}
}

impl InputState {
	pub fn bind(&mut self, command: Command, key: KeyCode) {
		self.command_binding.entry(command).or_default().insert(key);
	}

	pub fn unbind(&mut self, command: Command, key: KeyCode) {
		if let Some(keys) = self.command_binding.get_mut(&command) {
			keys.remove(&key);
		}
	}

	pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
		let pressed_flag = if pressed { Self::PRESSED } else { 0b0 };
		self.key_state.insert(key, Self::JUST | pressed_flag);
	}

	fn keys(&self, command: Command) -> impl Iterator<Item = &KeyCode> {
		self.command_binding.get(&command).into_iter().flatten()
	}

	pub fn is_pressed(&self, command: Command) -> bool {
		self.keys(command).any(|key|
			self.key_state.get(key).is_some_and(|state| state & Self::PRESSED != 0))
	}

	/// Pressed since the last call to `end_frame`.
	pub fn is_just_pressed(&self, command: Command) -> bool {
		self.keys(command).any(|key|
			self.key_state.get(key).is_some_and(|state| *state == Self::JUST | Self::PRESSED))
	}

	/// Commands to run this tick. Held movement keys repeat every tick, quit
	/// fires once per press.
	pub fn commands(&self) -> Vec<Command> {
		let mut commands: Vec<Command> = Command::REPEATING.into_iter()
			.filter(|&c| self.is_pressed(c))
			.collect();
		if self.is_just_pressed(Command::Quit) {
			commands.push(Command::Quit);
		}
		commands
	}

	/// Clears the just-pressed flags.
	pub fn end_frame(&mut self) {
		for state in self.key_state.values_mut() {
			*state &= Self::PRESSED;
		}
	}
}


#[test]
fn held_keys_repeat() {
	let mut input = InputState::default();
	input.set_key_state(KeyCode::KeyW, true);
	input.set_key_state(KeyCode::ArrowLeft, true);
	assert_eq!(input.commands(), vec![Command::MoveForward, Command::TurnLeft]);
	input.end_frame();
	assert_eq!(input.commands(), vec![Command::MoveForward, Command::TurnLeft]);

	input.set_key_state(KeyCode::KeyW, false);
	assert_eq!(input.commands(), vec![Command::TurnLeft]);
}

#[test]
fn quit_fires_once_per_press() {
	let mut input = InputState::default();
	input.set_key_state(KeyCode::Escape, true);
	assert_eq!(input.commands(), vec![Command::Quit]);
	input.end_frame();
	assert!(input.commands().is_empty());
}

#[test]
fn rebinding() {
	let mut input = InputState::default();
	input.unbind(Command::TurnRight, KeyCode::KeyD);
	input.bind(Command::TurnRight, KeyCode::KeyE);
	input.set_key_state(KeyCode::KeyD, true);
	assert!(!input.is_pressed(Command::TurnRight));
	input.set_key_state(KeyCode::KeyE, true);
	assert!(input.is_pressed(Command::TurnRight));
}
