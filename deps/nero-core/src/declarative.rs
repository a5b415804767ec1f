use serenity::builder::CreateApplicationCommands;

/// The component declaration trait.
///
/// Used to declare the application commands of a component.
/// Components that only handle events keep the default, which declares nothing.
pub trait ComponentDeclarative {
    fn declare(&self, _commands: &mut CreateApplicationCommands) {}
}
