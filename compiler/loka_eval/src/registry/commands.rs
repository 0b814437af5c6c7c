//! Default commands.

use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use super::{CommandDefinition, CommandInput};
use crate::errors::{element_required, wrong_arg_type};
use crate::host::Element;
use crate::{EvalError, ExecutionContext, Value};

/// `log a, b, ...`: writes the arguments through tracing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogCommand;

impl CommandDefinition for LogCommand {
    fn name(&self) -> &str {
        "log"
    }

    fn execute<'a>(
        &'a self,
        input: CommandInput,
        _ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, Result<Value, EvalError>> {
        async move {
            let line = input
                .args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            tracing::info!(target: "loka::log", "{line}");
            Ok(Value::Undefined)
        }
        .boxed_local()
    }
}

/// `add .cls [to target]`
#[derive(Clone, Copy, Debug, Default)]
pub struct AddCommand;

/// `remove .cls [from target]`
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveCommand;

/// `toggle .cls [on target]`
#[derive(Clone, Copy, Debug, Default)]
pub struct ToggleCommand;

#[derive(Copy, Clone)]
enum ClassEdit {
    Add,
    Remove,
    Toggle,
}

impl ClassEdit {
    fn name(self) -> &'static str {
        match self {
            ClassEdit::Add => "add",
            ClassEdit::Remove => "remove",
            ClassEdit::Toggle => "toggle",
        }
    }

    fn preposition(self) -> &'static str {
        match self {
            ClassEdit::Add => "to",
            ClassEdit::Remove => "from",
            ClassEdit::Toggle => "on",
        }
    }

    fn apply(self, input: &CommandInput, ctx: &ExecutionContext) -> Result<Value, EvalError> {
        let classes = input
            .args
            .iter()
            .map(|arg| class_name(arg).ok_or_else(|| wrong_arg_type(self.name(), "a class reference")))
            .collect::<Result<Vec<_>, _>>()?;
        let target = input
            .modifier(self.preposition())
            .cloned()
            .unwrap_or_else(|| ctx.me.clone());
        let elements = target_elements(&target, self.name())?;
        for el in &elements {
            for class in &classes {
                match self {
                    ClassEdit::Add => el.add_class(class),
                    ClassEdit::Remove => el.remove_class(class),
                    ClassEdit::Toggle => {
                        el.toggle_class(class);
                    }
                }
            }
        }
        Ok(target)
    }
}

/// `.active` or `active` → `active`.
fn class_name(arg: &Value) -> Option<String> {
    let text = arg.as_str()?;
    let name = text.strip_prefix('.').unwrap_or(text);
    (!name.is_empty()).then(|| name.to_string())
}

fn target_elements(target: &Value, command: &str) -> Result<Vec<Element>, EvalError> {
    match target {
        Value::Element(_) | Value::Collection(_) | Value::Array(_) => Ok(target.elements()),
        _ => Err(element_required(&format!("`{command}`"))),
    }
}

macro_rules! class_command {
    ($ty:ident, $edit:expr) => {
        impl CommandDefinition for $ty {
            fn name(&self) -> &str {
                $edit.name()
            }

            fn selector_args_as_text(&self) -> bool {
                true
            }

            fn execute<'a>(
                &'a self,
                input: CommandInput,
                ctx: &'a mut ExecutionContext,
            ) -> LocalBoxFuture<'a, Result<Value, EvalError>> {
                async move { $edit.apply(&input, ctx) }.boxed_local()
            }
        }
    };
}

class_command!(AddCommand, ClassEdit::Add);
class_command!(RemoveCommand, ClassEdit::Remove);
class_command!(ToggleCommand, ClassEdit::Toggle);

/// `wait <ms>`: suspends the evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitCommand;

impl CommandDefinition for WaitCommand {
    fn name(&self) -> &str {
        "wait"
    }

    fn execute<'a>(
        &'a self,
        input: CommandInput,
        _ctx: &'a mut ExecutionContext,
    ) -> LocalBoxFuture<'a, Result<Value, EvalError>> {
        async move {
            let ms = input.args.first().map_or(0.0, Value::to_number);
            if !ms.is_finite() {
                return Err(wrong_arg_type("wait", "a duration in milliseconds"));
            }
            tokio::time::sleep(Duration::from_secs_f64(ms.max(0.0) / 1000.0)).await;
            Ok(Value::Undefined)
        }
        .boxed_local()
    }
}
