use std::any::TypeId;
use std::fmt::Write;

/// Stack of providers currently under construction
#[derive(Default)]
pub(super) struct DependencyChain {
    stack: Vec<(TypeId, &'static str)>,
}

impl DependencyChain {
    pub(super) fn contains(&self, type_id: TypeId) -> bool {
        self.stack.iter().any(|(id, _)| *id == type_id)
    }

    pub(super) fn push(&mut self, type_id: TypeId, type_name: &'static str) {
        self.stack.push((type_id, type_name));
    }

    pub(super) fn pop(&mut self) {
        self.stack.pop();
    }

    pub(super) fn clear(&mut self) {
        self.stack.clear();
    }

    /// `[ A -> B --> A ]`, the arrow marks where the cycle closes
    pub(super) fn render(&self) -> String {
        let Some((last, _)) = self.stack.last() else {
            return "[]".to_string();
        };

        let mut buf = String::from("[");
        for (i, (id, name)) in self.stack.iter().enumerate() {
            if i > 0 {
                buf.push_str(if id == last { " --> " } else { " -> " });
            } else {
                buf.push(' ');
            }
            let _ = write!(buf, "{name}");
        }
        buf.push_str(" ]");
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_cycle() {
        let mut chain = DependencyChain::default();
        chain.push(TypeId::of::<u8>(), "A");
        chain.push(TypeId::of::<u16>(), "B");
        chain.push(TypeId::of::<u8>(), "A");

        assert!(chain.contains(TypeId::of::<u16>()));
        assert_eq!(chain.render(), "[ A -> B --> A ]");
    }
}
