//! Month view bindings. Listeners live as
//! long as the painted subtree; a repaint
//! replaces them.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{
  EventListener,
  EventListenerOptions
};
use openhours_core::ItemHandle;
use openhours_core::navigator::{
  CalendarNavigator,
  MonthStep,
  NEXT_SELECTOR,
  NavKey,
  PREVIOUS_SELECTOR
};
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  KeyboardEvent
};

use crate::dom::{
  DomElement,
  DomGrid
};
use crate::widgets::{
  DomEngine,
  spawn_month_step
};

pub fn bind(
  engine: &Rc<DomEngine>,
  item: &ItemHandle<DomElement>
) {
  let root =
    item.borrow().element().element().clone();

  bind_step(
    engine,
    item,
    &root,
    PREVIOUS_SELECTOR,
    MonthStep::Previous
  );
  bind_step(
    engine,
    item,
    &root,
    NEXT_SELECTOR,
    MonthStep::Next
  );

  let grid =
    Rc::new(RefCell::new(DomGrid::collect(
      &root
    )));
  let navigator = Rc::new(RefCell::new(
    CalendarNavigator::new()
  ));
  let cells = grid.borrow().cells().to_vec();
  tracing::debug!(
    days = cells.len(),
    "binding month calendar"
  );

  for (position, cell) in cells {
    bind_day(
      &grid, &navigator, position, &cell
    );
  }
}

fn bind_step(
  engine: &Rc<DomEngine>,
  item: &ItemHandle<DomElement>,
  root: &Element,
  selector: &str,
  step: MonthStep
) {
  let Ok(Some(button)) =
    root.query_selector(selector)
  else {
    tracing::debug!(
      selector,
      "month view has no paging control"
    );
    return;
  };

  let engine = Rc::clone(engine);
  let item = Rc::clone(item);
  EventListener::new(
    &button,
    "click",
    move |_| {
      spawn_month_step(&engine, &item, step)
    }
  )
  .forget();
}

fn bind_day(
  grid: &Rc<RefCell<DomGrid>>,
  navigator: &Rc<
    RefCell<CalendarNavigator>
  >,
  position: u32,
  cell: &Element
) {
  {
    let grid = Rc::clone(grid);
    let navigator = Rc::clone(navigator);
    EventListener::new_with_options(
      cell,
      "keydown",
      EventListenerOptions::enable_prevent_default(),
      move |event| {
        let Some(key) = event
          .dyn_ref::<KeyboardEvent>()
          .and_then(|event| {
            NavKey::from_key(&event.key())
          })
        else {
          return;
        };
        let moved = navigator
          .borrow_mut()
          .handle_key(
            &mut *grid.borrow_mut(),
            key,
            position
          );
        if moved.is_some() {
          event.prevent_default();
        }
      }
    )
    .forget();
  }

  let grid = Rc::clone(grid);
  let navigator = Rc::clone(navigator);
  EventListener::new(
    cell,
    "click",
    move |_| {
      navigator
        .borrow_mut()
        .focus(&mut *grid.borrow_mut(), position);
    }
  )
  .forget();
}
