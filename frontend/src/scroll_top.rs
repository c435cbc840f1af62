use stylist::css;
use stylist::yew::Global;
use yew::prelude::*;
use yew_hooks::use_window_scroll;

use crate::dom;
use crate::scroll::ScrollEffects;

#[function_component(ScrollToTop)]
pub fn scroll_to_top() -> Html {
    let (_, scroll_y) = use_window_scroll();
    let visible = ScrollEffects::at(scroll_y).show_scroll_top;

    let onclick = Callback::from(|_: MouseEvent| {
        if let Ok(window) = dom::window() {
            dom::smooth_scroll_to(&window, 0.0);
        }
    });

    html! {
        <>
            <Global css={css!(r#"
                .scroll-to-top {
                    position: fixed;
                    bottom: 30px;
                    right: 30px;
                    width: 50px;
                    height: 50px;
                    border-radius: 50%;
                    background: linear-gradient(180deg, #d4af76 0%, #c9964d 100%);
                    color: #1a1a1a;
                    font-size: 24px;
                    border: none;
                    cursor: pointer;
                    opacity: 0;
                    visibility: hidden;
                    transition: all 0.3s ease;
                    z-index: 999;
                    box-shadow: 0 4px 15px rgba(212, 175, 118, 0.3);
                }

                .scroll-to-top.visible {
                    opacity: 1;
                    visibility: visible;
                }

                .scroll-to-top:hover {
                    transform: translateY(-5px);
                    box-shadow: 0 6px 20px rgba(212, 175, 118, 0.5);
                }

                @media (max-width: 768px) {
                    .scroll-to-top {
                        bottom: 20px;
                        right: 20px;
                        width: 45px;
                        height: 45px;
                        font-size: 20px;
                    }
                }
            "#)} />
            <button
                class={classes!("scroll-to-top", visible.then(|| "visible"))}
                aria-label="Scroll to top"
                {onclick}
            >
                {"↑"}
            </button>
        </>
    }
}
