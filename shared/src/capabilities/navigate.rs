use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigationOperation {
    Back,
    To { path: String },
}

impl Operation for NavigationOperation {
    type Output = ();
}

pub struct Navigate<Ev> {
    context: CapabilityContext<NavigationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigationOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<NavigationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn back(&self) {
        self.notify(NavigationOperation::Back);
    }

    pub fn to(&self, path: impl Into<String>) {
        self.notify(NavigationOperation::To { path: path.into() });
    }

    fn notify(&self, operation: NavigationOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
